//! Element finder module
//!
//! Resolves UI elements against a session, either bounded by a wait policy or
//! immediately.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::driver::{ElementHandle, Locator};
use crate::error::{Error, FailureKind, Result};
use crate::session::{Session, WaitPolicy};

/// Outcome of a batch visibility wait
///
/// `TimedOut` and `Visible(vec![])` are different answers: the first means the
/// candidates never all became visible, the second that there were none.
#[derive(Debug, Clone, PartialEq)]
pub enum AllVisible {
    Visible(Vec<ElementHandle>),
    TimedOut,
}

impl AllVisible {
    pub fn timed_out(&self) -> bool {
        matches!(self, AllVisible::TimedOut)
    }

    /// Visible elements, or an empty vector after a timeout
    pub fn into_elements(self) -> Vec<ElementHandle> {
        match self {
            AllVisible::Visible(elements) => elements,
            AllVisible::TimedOut => Vec::new(),
        }
    }
}

/// Element finder
///
/// Responsible for finding UI elements in the session's current context.
#[derive(Debug, Clone)]
pub struct ElementFinder {
    session: Arc<Session>,
}

impl ElementFinder {
    /// Create a new element finder
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Wait for an element to be present, bounded by the session's default wait
    pub async fn find(&self, locator: &Locator) -> Result<ElementHandle> {
        let wait = self.session.default_wait().clone();
        self.find_with(locator, &wait).await
    }

    /// Wait for an element to be present, bounded by `wait`
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn find_with(&self, locator: &Locator, wait: &WaitPolicy) -> Result<ElementHandle> {
        debug!("Finding element within {:?}", wait.timeout());

        let driver = self.session.driver();
        wait.until(&format!("presence of {}", locator), move || async move {
            Ok::<_, Error>(Some(driver.find_element(locator).await?))
        })
        .await
        .map_err(|err| match err {
            Error::Timeout(msg) => Error::not_found(msg),
            other => other,
        })
    }

    /// Wait until every candidate is displayed.
    ///
    /// Detached candidates count as not yet visible. Running out of time is not
    /// an error: it yields [`AllVisible::TimedOut`].
    #[instrument(skip_all, fields(count = elements.len()))]
    pub async fn find_all(&self, elements: &[ElementHandle]) -> Result<AllVisible> {
        let driver = self.session.driver();
        let result = self
            .session
            .default_wait()
            .until("visibility of all elements", move || async move {
                let checks = join_all(elements.iter().map(|el| driver.is_displayed(el))).await;
                for check in checks {
                    match check {
                        Ok(true) => {}
                        Ok(false) => return Ok(None),
                        Err(err) if err.kind == FailureKind::StaleReference => return Ok(None),
                        Err(err) => return Err(Error::from(err)),
                    }
                }
                Ok(Some(elements.to_vec()))
            })
            .await;

        match result {
            Ok(visible) => Ok(AllVisible::Visible(visible)),
            Err(Error::Timeout(msg)) => {
                warn!("Degrading to empty element list: {}", msg);
                Ok(AllVisible::TimedOut)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve an element without waiting
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn get_immediate(&self, locator: &Locator) -> Result<ElementHandle> {
        self.session
            .driver()
            .find_element(locator)
            .await
            .map_err(|err| match err.kind {
                FailureKind::NotFound => Error::not_found(format!("{}: {}", locator, err.message)),
                _ => Error::from(err),
            })
    }

    /// Resolve every matching element without waiting (possibly none)
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn get_all_immediate(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        Ok(self.session.driver().find_elements(locator).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, MockOp};
    use crate::driver::Platform;
    use std::time::Duration;

    fn finder_with(driver: Arc<MockDriver>, timeout_ms: u64) -> ElementFinder {
        let wait = WaitPolicy::new(Duration::from_millis(timeout_ms))
            .with_poll_interval(Duration::from_millis(5));
        ElementFinder::new(Arc::new(Session::new(Platform::Android, driver, wait)))
    }

    #[tokio::test]
    async fn test_find_waits_for_presence() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let handle = driver.add_element(Locator::accessibility_id("Login button"), "Login");
        driver.appear_after(&handle, 3);

        let finder = finder_with(driver.clone(), 1000);
        let found = finder.find(&Locator::accessibility_id("Login button")).await.unwrap();

        assert_eq!(found, handle);
        assert_eq!(driver.calls(MockOp::Find), 4);
    }

    #[tokio::test]
    async fn test_find_times_out_as_not_found() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let finder = finder_with(driver, 30);

        let err = finder.find(&Locator::id("missing")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_with_custom_wait() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let handle = driver.add_element(Locator::id("slow"), "");
        driver.appear_after(&handle, 1_000_000);

        let finder = finder_with(driver, 60_000);
        let short = WaitPolicy::new(Duration::from_millis(20)).with_poll_interval(Duration::from_millis(5));
        let err = finder.find_with(&Locator::id("slow"), &short).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_all_visible() {
        let driver = Arc::new(MockDriver::new(Platform::Web));
        let a = driver.add_element(Locator::css(".inventory_item"), "Backpack");
        let b = driver.add_element(Locator::css(".inventory_item"), "Bike Light");

        let finder = finder_with(driver, 100);
        let result = finder.find_all(&[a.clone(), b.clone()]).await.unwrap();
        assert_eq!(result, AllVisible::Visible(vec![a, b]));
    }

    #[tokio::test]
    async fn test_find_all_degrades_to_empty() {
        let driver = Arc::new(MockDriver::new(Platform::Web));
        let a = driver.add_element(Locator::css(".inventory_item"), "Backpack");
        driver.set_displayed(&a, false);

        let finder = finder_with(driver, 30);
        let result = finder.find_all(&[a]).await.unwrap();
        assert!(result.timed_out());
        assert!(result.into_elements().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_empty_input_is_not_timeout() {
        let driver = Arc::new(MockDriver::new(Platform::Web));
        let finder = finder_with(driver, 30);

        let result = finder.find_all(&[]).await.unwrap();
        assert_eq!(result, AllVisible::Visible(vec![]));
    }

    #[tokio::test]
    async fn test_get_immediate_does_not_wait() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        let handle = driver.add_element(Locator::id("late"), "");
        driver.appear_after(&handle, 1);

        let finder = finder_with(driver.clone(), 60_000);
        let err = finder.get_immediate(&Locator::id("late")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(driver.calls(MockOp::Find), 1);
    }

    #[tokio::test]
    async fn test_get_all_immediate() {
        let driver = Arc::new(MockDriver::new(Platform::Android));
        driver.add_element(Locator::xpath("//android.widget.TextView"), "one");
        driver.add_element(Locator::xpath("//android.widget.TextView"), "two");

        let finder = finder_with(driver, 10);
        let all = finder
            .get_all_immediate(&Locator::xpath("//android.widget.TextView"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(finder.get_all_immediate(&Locator::id("none")).await.unwrap().is_empty());
    }
}
