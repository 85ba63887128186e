//! Screen-Automation: retrying element actions over mobile and web drivers
//!
//! This library wraps an automation driver (Appium, chromedriver, ...) with
//! explicit waits, a failure-kind driven retry engine, native/webview context
//! switching and a composable screen layer.

pub mod config;
pub mod error;

pub mod actions;
pub mod context;
pub mod driver;
pub mod retry;
pub mod screen;
pub mod session;
pub mod telemetry;

// Re-exports
pub use error::{DriverError, DriverResult, Error, FailureKind, Result};

/// Screen-Automation library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
