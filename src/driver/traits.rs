//! Driver capability traits
//!
//! This module defines the abstract interfaces a concrete automation backend
//! (Appium, chromedriver, ...) has to provide.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

use super::locator::{ElementHandle, Locator};
use crate::error::DriverResult;

/// Platform a session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => f.write_str("Android"),
            Platform::Ios => f.write_str("iOS"),
            Platform::Web => f.write_str("Web"),
        }
    }
}

/// Everything a factory needs to open a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub platform: Platform,
    /// Automation server endpoint
    pub server_url: String,
    /// Device name for mobile sessions
    pub device_name: Option<String>,
    /// Local driver executable for web sessions
    pub driver_path: Option<String>,
    /// W3C capabilities sent with the new-session request
    pub capabilities: Map<String, Value>,
}

impl SessionRequest {
    /// Android session through UiAutomator2
    pub fn android(server_url: &str, device_name: &str, app_path: &str) -> Self {
        let mut capabilities = Map::new();
        capabilities.insert("platformName".into(), json!("Android"));
        capabilities.insert("appium:automationName".into(), json!("UiAutomator2"));
        capabilities.insert("appium:deviceName".into(), json!(device_name));
        capabilities.insert("appium:app".into(), json!(app_path));
        capabilities.insert("appium:chromedriver_autodownload".into(), json!(true));

        Self {
            platform: Platform::Android,
            server_url: server_url.to_string(),
            device_name: Some(device_name.to_string()),
            driver_path: None,
            capabilities,
        }
    }

    /// iOS session through XCUITest
    pub fn ios(server_url: &str, device_name: &str, app_path: &str) -> Self {
        let mut capabilities = Map::new();
        capabilities.insert("platformName".into(), json!("iOS"));
        capabilities.insert("appium:automationName".into(), json!("XCUITest"));
        capabilities.insert("appium:deviceName".into(), json!(device_name));
        capabilities.insert("appium:app".into(), json!(app_path));

        Self {
            platform: Platform::Ios,
            server_url: server_url.to_string(),
            device_name: Some(device_name.to_string()),
            driver_path: None,
            capabilities,
        }
    }

    /// Desktop Chrome session driven by a local chromedriver
    pub fn web(driver_path: &str) -> Self {
        let mut capabilities = Map::new();
        capabilities.insert("browserName".into(), json!("chrome"));

        Self {
            platform: Platform::Web,
            server_url: String::new(),
            device_name: None,
            driver_path: Some(driver_path.to_string()),
            capabilities,
        }
    }
}

/// Native/webview context switching capability
///
/// Only mobile drivers expose this; see [`Driver::context_switching`].
#[async_trait]
pub trait ContextSwitching: Send + Sync {
    /// List available context handles (e.g. `NATIVE_APP`, `WEBVIEW_1234`)
    async fn context_handles(&self) -> DriverResult<Vec<String>>;

    /// Currently selected context handle
    async fn current_context(&self) -> DriverResult<String>;

    /// Select a context handle
    async fn set_context(&self, handle: &str) -> DriverResult<()>;
}

/// Automation driver trait
///
/// Represents one live connection to an automation backend. Element calls
/// never wait: waiting is layered on top by [`WaitPolicy`](crate::session::WaitPolicy).
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Platform this driver automates
    fn platform(&self) -> Platform;

    /// Resolve the first element matching a locator
    async fn find_element(&self, locator: &Locator) -> DriverResult<ElementHandle>;

    /// Resolve every element matching a locator (possibly none)
    async fn find_elements(&self, locator: &Locator) -> DriverResult<Vec<ElementHandle>>;

    /// Click an element
    async fn click(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Clear an editable element
    async fn clear(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Type into an element
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()>;

    /// Visible text of an element
    async fn text(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Whether an element is displayed
    async fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether an element is enabled
    async fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Enter an iframe, or return to the top document with `None`
    async fn switch_to_frame(&self, frame: Option<&ElementHandle>) -> DriverResult<()>;

    /// End the remote session
    async fn quit(&self) -> DriverResult<()>;

    /// Context switching capability, if the driver supports it
    fn context_switching(&self) -> Option<&dyn ContextSwitching> {
        None
    }
}

/// Opens driver connections for the session manager
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn connect(&self, request: &SessionRequest) -> DriverResult<Arc<dyn Driver>>;
}
