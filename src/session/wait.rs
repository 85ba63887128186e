//! Explicit and fluent waits
//!
//! A [`WaitPolicy`] polls a condition until it yields a value or the timeout
//! elapses. Failures of an ignored kind count as "not yet"; any other failure
//! ends the wait immediately.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Error, FailureKind, Result};

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timeout, poll interval and ignorable failure kinds for one wait
#[derive(Debug, Clone, PartialEq)]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
    ignored: Vec<FailureKind>,
}

impl WaitPolicy {
    /// Wait for `timeout`, polling every 500ms and ignoring missing elements
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            ignored: vec![FailureKind::NotFound],
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Replace the set of ignored failure kinds
    pub fn ignoring(mut self, kinds: &[FailureKind]) -> Self {
        self.ignored = kinds.to_vec();
        self
    }

    /// Same poll interval and ignored kinds, different timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn ignored(&self) -> &[FailureKind] {
        &self.ignored
    }

    fn ignores(&self, error: &Error) -> bool {
        error.kind().is_some_and(|kind| self.ignored.contains(&kind))
    }

    /// Poll `condition` until it returns `Some`.
    ///
    /// The condition is evaluated at least once, even with a zero timeout.
    /// Running out of time yields [`Error::Timeout`] naming `description`.
    pub async fn until<T, F, Fut>(&self, description: &str, mut condition: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let started = Instant::now();
        let mut last_error: Option<Error> = None;

        loop {
            match condition().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(err) if self.ignores(&err) => {
                    trace!("Ignoring {} while waiting for {}", err, description);
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                let cause = last_error
                    .map(|e| format!(" (last error: {})", e))
                    .unwrap_or_default();
                return Err(Error::timeout(format!(
                    "{} not satisfied within {:?}{}",
                    description, self.timeout, cause
                )));
            }

            tokio::time::sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}
