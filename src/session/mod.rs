//! # Session layer
//!
//! Owns the lifecycle of the automation driver and the waits built on it.
//!
//! ## Core concepts
//! - **SessionManager**: starts, exposes and ends the single active session
//! - **Session**: one live driver bound to a platform, shared as `Arc<Session>`
//! - **WaitPolicy**: explicit / fluent wait polling a condition until it holds
//!
//! ## Module layout
//! - `manager`: session manager
//! - `handle`: session handle and context bookkeeping
//! - `wait`: explicit and fluent waits
//!
//! ## Example
//! ```rust,no_run
//! use screen_automation::session::SessionManager;
//! use std::time::Duration;
//!
//! # async fn example(manager: SessionManager) -> screen_automation::Result<()> {
//! let session = manager.start_android_session("Pixel_7", Some(Duration::from_secs(15))).await?;
//! println!("Session {} on {}", session.id(), session.platform());
//!
//! let executor = manager.executor()?;
//! executor.click(screen_automation::driver::Locator::accessibility_id("open menu")).await?;
//!
//! manager.end_session().await?;
//! # Ok(())
//! # }
//! ```

pub mod handle;
pub mod manager;
pub mod wait;


pub use handle::{Context, Session, NATIVE_CONTEXT, WEBVIEW_MARKER};
pub use manager::SessionManager;
pub use wait::{WaitPolicy, DEFAULT_POLL_INTERVAL};
