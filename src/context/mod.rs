//! # Context and frame switching
//!
//! Hybrid mobile apps render part of their UI inside an embedded web view.
//! [`ContextSwitcher`] moves a session between the native surface and the
//! first available webview; [`FrameSwitcher`] moves a web document into and
//! out of iframes.

pub mod frames;
pub mod switcher;

pub use frames::FrameSwitcher;
pub use switcher::ContextSwitcher;
