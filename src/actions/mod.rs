//! # Element actions
//!
//! Finding elements and acting on them against a live [`Session`](crate::session::Session).
//!
//! - `finder`: waited and immediate element resolution, batch visibility waits
//! - `executor`: click / type / read / state checks wrapped in the retry engine
//!
//! ```rust,no_run
//! use screen_automation::actions::ActionExecutor;
//! use screen_automation::driver::Locator;
//! # async fn example(session: std::sync::Arc<screen_automation::session::Session>) -> screen_automation::Result<()> {
//! let executor = ActionExecutor::new(session);
//! executor.type_text(Locator::id("user-name"), "standard_user").await?;
//! executor.click(Locator::id("login-button")).await?;
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod finder;

pub use executor::{
    ActionExecutor, Target, CLICK_RECOVERABLE, DEFAULT_ACTION_RETRIES, READ_RECOVERABLE,
    TYPE_RECOVERABLE,
};
pub use finder::{AllVisible, ElementFinder};
