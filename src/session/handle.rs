//! Active session handle

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

use super::wait::WaitPolicy;
use crate::driver::{Driver, Platform};

/// Well-known handle of the native application context
pub const NATIVE_CONTEXT: &str = "NATIVE_APP";

/// Marker contained in every webview context handle
pub const WEBVIEW_MARKER: &str = "WEBVIEW";

/// Execution surface the session currently targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    Native,
    /// Webview surface with the selected driver handle
    WebView(String),
}

impl Context {
    pub fn is_webview(&self) -> bool {
        matches!(self, Context::WebView(_))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Native => f.write_str(NATIVE_CONTEXT),
            Context::WebView(handle) => f.write_str(handle),
        }
    }
}

/// One live automation driver bound to a platform
///
/// Sessions are only created by the [`SessionManager`](super::SessionManager);
/// collaborators share them through `Arc<Session>`.
#[derive(Debug)]
pub struct Session {
    id: String,
    platform: Platform,
    driver: Arc<dyn Driver>,
    default_wait: WaitPolicy,
    context: RwLock<Context>,
    started_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(platform: Platform, driver: Arc<dyn Driver>, default_wait: WaitPolicy) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            platform,
            driver,
            default_wait,
            context: RwLock::new(Context::Native),
            started_at: Utc::now(),
        }
    }

    /// Get session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn default_wait(&self) -> &WaitPolicy {
        &self.default_wait
    }

    /// One-off policy with the session's poll settings and a different timeout
    pub fn wait_with_timeout(&self, timeout: Duration) -> WaitPolicy {
        self.default_wait.with_timeout(timeout)
    }

    /// Context recorded by the last switch
    pub fn context(&self) -> Context {
        self.context
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn set_context(&self, context: Context) {
        match self.context.write() {
            Ok(mut guard) => *guard = context,
            Err(poisoned) => *poisoned.into_inner() = context,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    #[test]
    fn test_new_session_starts_native() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let session = Session::new(Platform::Android, driver, WaitPolicy::new(Duration::from_secs(10)));

        assert!(!session.id().is_empty());
        assert_eq!(session.context(), Context::Native);
        assert_eq!(session.default_wait().timeout(), Duration::from_secs(10));
        assert_eq!(
            session.wait_with_timeout(Duration::from_secs(3)).timeout(),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_context_survives_poisoned_lock() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let session = Arc::new(Session::new(
            Platform::Android,
            driver,
            WaitPolicy::new(Duration::from_secs(1)),
        ));

        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.context.write().unwrap();
            panic!("poison the context lock");
        })
        .join();
        assert!(session.context.is_poisoned());

        session.set_context(Context::WebView("WEBVIEW_1".to_string()));
        assert_eq!(session.context(), Context::WebView("WEBVIEW_1".to_string()));
    }

    #[test]
    fn test_context_display() {
        assert_eq!(Context::Native.to_string(), "NATIVE_APP");
        let webview = Context::WebView("WEBVIEW_com.saucelabs".to_string());
        assert_eq!(webview.to_string(), "WEBVIEW_com.saucelabs");
        assert!(webview.is_webview());
    }
}
