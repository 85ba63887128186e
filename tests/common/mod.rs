//! Common test utilities
//!
//! Shared fixtures for the integration tests: configs with short polling and
//! session managers wired to a caller-provided mock driver.

#![allow(dead_code)]

use screen_automation::config::Config;
use screen_automation::driver::mock::{MockDriver, MockDriverFactory};
use screen_automation::driver::Platform;
use screen_automation::session::{Session, SessionManager};
use std::sync::Arc;
use std::time::Duration;

pub const CHROMEDRIVER: &str = "/usr/local/bin/chromedriver";
pub const DEVICE: &str = "Pixel_7_API_34";

/// Config with fast polling so waits resolve quickly
pub fn test_config() -> Config {
    Config {
        app_path: "/builds/mda-2.0.0.apk".to_string(),
        poll_interval: 5,
        ..Default::default()
    }
}

/// Manager whose factory always hands out `driver`
pub fn manager_for(driver: Arc<MockDriver>) -> SessionManager {
    SessionManager::new(test_config(), Arc::new(MockDriverFactory::with_driver(driver)))
}

/// Start a session on `driver` for its platform with the given default wait
pub async fn start_session(
    driver: Arc<MockDriver>,
    platform: Platform,
    timeout: Duration,
) -> anyhow::Result<(SessionManager, Arc<Session>)> {
    let manager = manager_for(driver);
    let session = match platform {
        Platform::Android => manager.start_android_session(DEVICE, Some(timeout)).await?,
        Platform::Ios => manager.start_ios_session("iPhone 15", Some(timeout)).await?,
        Platform::Web => manager.start_web_session(CHROMEDRIVER, Some(timeout)).await?,
    };
    Ok((manager, session))
}
