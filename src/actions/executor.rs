//! Element action executor
//!
//! Composes element resolution, explicit waits and the retry engine into the
//! actions screens perform: click, type, read text, enabled/visible checks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::finder::ElementFinder;
use crate::config::Config;
use crate::driver::{ElementHandle, Locator};
use crate::error::{Error, FailureKind, Result};
use crate::retry::{Backoff, RetryPolicy};
use crate::session::{Session, WaitPolicy};

/// Retries granted to each action after its first attempt
pub const DEFAULT_ACTION_RETRIES: u32 = 3;

/// Transient failures worth retrying a click for
pub const CLICK_RECOVERABLE: &[FailureKind] =
    &[FailureKind::StaleReference, FailureKind::ClickIntercepted];

/// Transient failures worth retrying typing for
pub const TYPE_RECOVERABLE: &[FailureKind] =
    &[FailureKind::StaleReference, FailureKind::NotInteractable];

/// Transient failures worth retrying a text read for
pub const READ_RECOVERABLE: &[FailureKind] =
    &[FailureKind::StaleReference, FailureKind::ClickIntercepted];

/// What an action operates on
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Resolved on every attempt
    Locator(Locator),
    /// Already resolved; a stale handle stays stale
    Element(ElementHandle),
}

impl From<Locator> for Target {
    fn from(locator: Locator) -> Self {
        Target::Locator(locator)
    }
}

impl From<&Locator> for Target {
    fn from(locator: &Locator) -> Self {
        Target::Locator(locator.clone())
    }
}

impl From<ElementHandle> for Target {
    fn from(element: ElementHandle) -> Self {
        Target::Element(element)
    }
}

impl From<&ElementHandle> for Target {
    fn from(element: &ElementHandle) -> Self {
        Target::Element(element.clone())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Locator(locator) => write!(f, "{}", locator),
            Target::Element(element) => write!(f, "{}", element),
        }
    }
}

/// Element action executor
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    finder: ElementFinder,
    retries: u32,
    backoff: Backoff,
    ceiling: Option<Duration>,
}

impl ActionExecutor {
    /// Create an executor with [`DEFAULT_ACTION_RETRIES`] and no backoff
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            finder: ElementFinder::new(session),
            retries: DEFAULT_ACTION_RETRIES,
            backoff: Backoff::None,
            ceiling: None,
        }
    }

    /// Create an executor using the retry settings in `config`
    pub fn from_config(session: Arc<Session>, config: &Config) -> Self {
        let backoff = if config.retry_backoff().is_zero() {
            Backoff::None
        } else {
            Backoff::Fixed(config.retry_backoff())
        };

        Self::new(session)
            .with_retries(config.action_retries)
            .with_backoff(backoff)
            .with_ceiling(config.retry_ceiling())
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_ceiling(mut self, ceiling: Option<Duration>) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn finder(&self) -> &ElementFinder {
        &self.finder
    }

    fn session(&self) -> &Arc<Session> {
        self.finder.session()
    }

    fn policy(&self, recoverable: &[FailureKind]) -> RetryPolicy {
        RetryPolicy::new(recoverable)
            .with_max_retries(self.retries)
            .with_backoff(self.backoff.clone())
            .with_max_elapsed(self.ceiling)
    }

    /// Click an element once it is visible and enabled
    #[instrument(skip_all)]
    pub async fn click(&self, target: impl Into<Target>) -> Result<()> {
        let target = target.into();
        debug!("Click requested on {}", target);
        self.policy(CLICK_RECOVERABLE)
            .execute_void(|| self.click_once(&target))
            .await
    }

    async fn click_once(&self, target: &Target) -> Result<()> {
        let element = match target {
            Target::Locator(locator) => self.finder.find(locator).await?,
            Target::Element(element) => element.clone(),
        };
        self.wait_clickable(&element).await?;
        info!("Clicking element {}", element);
        self.session().driver().click(&element).await?;
        Ok(())
    }

    /// Clear an element and type `text` into it
    #[instrument(skip_all)]
    pub async fn type_text(&self, target: impl Into<Target>, text: &str) -> Result<()> {
        let target = target.into();
        self.policy(TYPE_RECOVERABLE)
            .execute_void(|| self.type_once(&target, text))
            .await
    }

    async fn type_once(&self, target: &Target, text: &str) -> Result<()> {
        let element = match target {
            Target::Locator(locator) => self.finder.get_immediate(locator).await?,
            Target::Element(element) => element.clone(),
        };
        self.wait_clickable(&element).await?;
        let driver = self.session().driver();
        driver.clear(&element).await?;
        info!("Sending keys '{}' to element {}", text, element);
        driver.send_keys(&element, text).await?;
        Ok(())
    }

    /// Read an element's visible text
    #[instrument(skip_all)]
    pub async fn read_text(&self, target: impl Into<Target>) -> Result<String> {
        let target = target.into();
        self.policy(READ_RECOVERABLE)
            .execute_text(|| self.read_once(&target))
            .await
    }

    async fn read_once(&self, target: &Target) -> Result<String> {
        let element = match target {
            Target::Locator(locator) => self.finder.find(locator).await?,
            Target::Element(element) => element.clone(),
        };
        self.wait_visible(&element).await?;
        let text = self.session().driver().text(&element).await?;
        info!("Read '{}' from element {}", text, element);
        Ok(text)
    }

    /// Whether the element is enabled; `false` if it never becomes visible
    #[instrument(skip_all)]
    pub async fn is_enabled(&self, target: impl Into<Target>) -> Result<bool> {
        let target = target.into();
        let checked = self.enabled_once(&target).await;
        self.absent_as_false(&target, checked)
    }

    async fn enabled_once(&self, target: &Target) -> Result<bool> {
        let element = self.visible_target(target).await?;
        info!("Checking whether element {} is enabled", element);
        Ok(self.session().driver().is_enabled(&element).await?)
    }

    /// Whether the element becomes visible within the default wait
    #[instrument(skip_all)]
    pub async fn is_visible(&self, target: impl Into<Target>) -> Result<bool> {
        let target = target.into();
        debug!("Checking visibility of {}", target);
        let checked = self.visible_target(&target).await.map(|_| true);
        self.absent_as_false(&target, checked)
    }

    fn absent_as_false(&self, target: &Target, checked: Result<bool>) -> Result<bool> {
        match checked {
            Err(err) if err.is_absence() => {
                warn!("Element {} did not show up: {}", target, err);
                Ok(false)
            }
            other => other,
        }
    }

    /// Single bounded visibility wait, resolving locators on every poll
    async fn visible_target(&self, target: &Target) -> Result<ElementHandle> {
        match target {
            Target::Element(element) => {
                self.wait_visible(element).await?;
                Ok(element.clone())
            }
            Target::Locator(locator) => {
                let driver = self.session().driver();
                self.wait()
                    .until(&format!("visibility of {}", locator), move || async move {
                        let element = driver.find_element(locator).await?;
                        match driver.is_displayed(&element).await {
                            Ok(true) => Ok(Some(element)),
                            Ok(false) => Ok(None),
                            Err(err) if err.kind == FailureKind::StaleReference => Ok(None),
                            Err(err) => Err(Error::from(err)),
                        }
                    })
                    .await
            }
        }
    }

    async fn wait_visible(&self, element: &ElementHandle) -> Result<()> {
        let driver = self.session().driver();
        self.wait()
            .until(&format!("visibility of {}", element), move || async move {
                Ok::<_, Error>(driver.is_displayed(element).await?.then_some(()))
            })
            .await
    }

    async fn wait_clickable(&self, element: &ElementHandle) -> Result<()> {
        let driver = self.session().driver();
        self.wait()
            .until(&format!("clickability of {}", element), move || async move {
                let ready = driver.is_displayed(element).await? && driver.is_enabled(element).await?;
                Ok::<_, Error>(ready.then_some(()))
            })
            .await
    }

    fn wait(&self) -> &WaitPolicy {
        self.session().default_wait()
    }
}
