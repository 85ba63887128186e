//! Session manager
//!
//! Owns at most one live session at a time and hands out shared handles to it.

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::handle::Session;
use super::wait::WaitPolicy;
use crate::actions::{ActionExecutor, ElementFinder};
use crate::config::Config;
use crate::context::{ContextSwitcher, FrameSwitcher};
use crate::driver::mock::MockDriverFactory;
use crate::driver::{DriverFactory, SessionRequest};
use crate::error::{Error, FailureKind, Result};
use crate::screen::ScreenContext;

/// Session manager
///
/// Starting a session while another one is active ends the previous one first.
pub struct SessionManager {
    config: Config,
    factory: Arc<dyn DriverFactory>,
    active: RwLock<Option<Arc<Session>>>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(config: Config, factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            config,
            factory,
            active: RwLock::new(None),
        }
    }

    /// Create a session manager backed by mock drivers for testing
    pub fn mock() -> Self {
        Self::new(Config::default(), Arc::new(MockDriverFactory::new()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start an Android session on `device_name` with the configured app
    pub async fn start_android_session(
        &self,
        device_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<Session>> {
        let request =
            SessionRequest::android(&self.config.server_url, device_name, &self.config.app_path);
        self.start(request, timeout).await
    }

    /// Start an iOS session on `device_name` with the configured app
    pub async fn start_ios_session(
        &self,
        device_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<Session>> {
        let request =
            SessionRequest::ios(&self.config.server_url, device_name, &self.config.app_path);
        self.start(request, timeout).await
    }

    /// Start a desktop browser session through the chromedriver at `driver_path`
    pub async fn start_web_session(
        &self,
        driver_path: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<Session>> {
        self.start(SessionRequest::web(driver_path), timeout).await
    }

    #[instrument(skip_all, fields(platform = %request.platform))]
    async fn start(&self, request: SessionRequest, timeout: Option<Duration>) -> Result<Arc<Session>> {
        if let Some(previous) = self.take_active()? {
            warn!(
                "Session {} is still active, ending it before starting a new one",
                previous.id()
            );
            if let Err(e) = previous.driver().quit().await {
                warn!("Failed to quit previous session {}: {}", previous.id(), e);
            }
        }

        info!("Starting {} session", request.platform);
        let driver = self
            .factory
            .connect(&request)
            .await
            .map_err(|source| Error::SessionStart {
                platform: request.platform,
                source,
            })?;

        let wait = WaitPolicy::new(timeout.unwrap_or_else(|| self.config.default_timeout()))
            .with_poll_interval(self.config.poll_interval());
        let session = Arc::new(Session::new(request.platform, driver, wait));

        *self
            .active
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))? = Some(session.clone());

        info!("Session {} started", session.id());
        Ok(session)
    }

    fn take_active(&self) -> Result<Option<Arc<Session>>> {
        Ok(self
            .active
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .take())
    }

    /// The active session; the same handle until the session ends
    pub fn active_session(&self) -> Result<Arc<Session>> {
        self.active
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .clone()
            .ok_or(Error::NotInitialized)
    }

    pub fn is_active(&self) -> bool {
        self.active
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// The active session's default explicit wait
    pub fn default_wait(&self) -> Result<WaitPolicy> {
        Ok(self.active_session()?.default_wait().clone())
    }

    /// Explicit wait with a custom timeout on the active session
    pub fn wait_with_timeout(&self, timeout: Duration) -> Result<WaitPolicy> {
        Ok(self.active_session()?.wait_with_timeout(timeout))
    }

    /// Wait with custom timeout, poll interval and ignored failure kinds
    pub fn fluent_wait(
        &self,
        timeout: Duration,
        poll_interval: Duration,
        ignored: &[FailureKind],
    ) -> Result<WaitPolicy> {
        self.active_session()?;
        Ok(WaitPolicy::new(timeout)
            .with_poll_interval(poll_interval)
            .ignoring(ignored))
    }

    /// End the active session, if any
    #[instrument(skip_all)]
    pub async fn end_session(&self) -> Result<()> {
        match self.take_active()? {
            Some(session) => {
                info!("Ending session {}", session.id());
                session.driver().quit().await?;
                Ok(())
            }
            None => {
                debug!("No active session to end");
                Ok(())
            }
        }
    }

    pub fn finder(&self) -> Result<ElementFinder> {
        Ok(ElementFinder::new(self.active_session()?))
    }

    /// Action executor using the configured retry settings
    pub fn executor(&self) -> Result<ActionExecutor> {
        Ok(ActionExecutor::from_config(self.active_session()?, &self.config))
    }

    pub fn context_switcher(&self) -> Result<ContextSwitcher> {
        Ok(ContextSwitcher::new(self.active_session()?))
    }

    pub fn frames(&self) -> Result<FrameSwitcher> {
        Ok(FrameSwitcher::new(self.active_session()?))
    }

    /// Everything a screen needs, bound to the active session
    pub fn screen(&self) -> Result<ScreenContext> {
        Ok(ScreenContext::from_config(self.active_session()?, &self.config))
    }
}
