//! # Driver layer
//!
//! Abstract capability interfaces for the automation backend. A concrete
//! backend (an Appium or chromedriver client) implements [`Driver`] and is
//! opened through a [`DriverFactory`]; the rest of the crate only talks to
//! these traits.
//!
//! ## Module structure
//! - `traits`: driver, context-switching and factory traits, platform and session request
//! - `locator`: element locators and driver-issued element handles
//! - `mock`: scriptable mock driver used by the test suite

pub mod locator;
pub mod mock;
pub mod traits;

pub use locator::{ElementHandle, Locator};
pub use traits::{ContextSwitching, Driver, DriverFactory, Platform, SessionRequest};
