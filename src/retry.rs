//! Bounded retry over an explicit allow-list of failure kinds
//!
//! A [`RetryPolicy`] runs an async operation, retrying only failures whose
//! [`FailureKind`] the caller declared recoverable. Anything else fails fast
//! as [`Error::UnhandledFailure`]; a recoverable failure that outlives the
//! retry budget (or the optional elapsed-time ceiling) becomes
//! [`Error::RetriesExhausted`] wrapping the last cause.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, FailureKind, Result};

/// Retries granted after the first attempt when a policy does not say otherwise
pub const DEFAULT_RETRY_COUNT: u32 = 1;

/// Delay between attempts
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Backoff {
    /// Retry immediately
    #[default]
    None,
    /// Same delay before every retry
    Fixed(Duration),
    /// `initial * 2^(retry - 1)`, capped at `max`
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay before the given retry (1-based)
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { initial, max } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                initial.saturating_mul(factor).min(*max)
            }
        }
    }
}

/// Retry template: which failures to retry, how often, and how patiently
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    recoverable: Vec<FailureKind>,
    max_retries: u32,
    backoff: Backoff,
    max_elapsed: Option<Duration>,
}

impl RetryPolicy {
    /// Policy retrying `recoverable` kinds [`DEFAULT_RETRY_COUNT`] times, without delay
    pub fn new(recoverable: &[FailureKind]) -> Self {
        Self {
            recoverable: recoverable.to_vec(),
            max_retries: DEFAULT_RETRY_COUNT,
            backoff: Backoff::None,
            max_elapsed: None,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Stop retrying once this much time has passed since the first attempt
    pub fn with_max_elapsed(mut self, ceiling: Option<Duration>) -> Self {
        self.max_elapsed = ceiling;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn recoverable(&self) -> &[FailureKind] {
        &self.recoverable
    }

    /// Whether `error` is on this policy's allow-list
    pub fn is_recoverable(&self, error: &Error) -> bool {
        error
            .kind()
            .is_some_and(|kind| self.recoverable.contains(&kind))
    }

    /// Run `operation` until it succeeds, fails unrecoverably, or the budget runs out
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let err = match operation().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!("Operation succeeded on attempt {}", attempts);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !self.is_recoverable(&err) {
                debug!("Unrecoverable failure on attempt {}: {}", attempts, err);
                return Err(Error::UnhandledFailure {
                    source: Box::new(err),
                });
            }

            if attempts > self.max_retries {
                warn!("Giving up after {} attempts: {}", attempts, err);
                return Err(Error::RetriesExhausted {
                    attempts,
                    source: Box::new(err),
                });
            }

            let delay = self.backoff.delay(attempts);
            if let Some(ceiling) = self.max_elapsed {
                if started.elapsed().saturating_add(delay) >= ceiling {
                    warn!(
                        "Retry ceiling of {:?} reached after {} attempts: {}",
                        ceiling, attempts, err
                    );
                    return Err(Error::RetriesExhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }
            }

            debug!(
                "Recoverable failure on attempt {} ({}), retrying in {:?}",
                attempts, err, delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// [`execute`](Self::execute) for operations producing nothing
    pub async fn execute_void<F, Fut>(&self, operation: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.execute(operation).await
    }

    pub async fn execute_bool<F, Fut>(&self, operation: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        self.execute(operation).await
    }

    pub async fn execute_int<F, Fut>(&self, operation: F) -> Result<i64>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<i64>>,
    {
        self.execute(operation).await
    }

    pub async fn execute_float<F, Fut>(&self, operation: F) -> Result<f64>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<f64>>,
    {
        self.execute(operation).await
    }

    pub async fn execute_text<F, Fut>(&self, operation: F) -> Result<String>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        self.execute(operation).await
    }
}

/// One-shot form of [`RetryPolicy::execute`]
pub async fn execute_with_retry<T, F, Fut>(
    operation: F,
    max_retries: u32,
    recoverable: &[FailureKind],
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    RetryPolicy::new(recoverable)
        .with_max_retries(max_retries)
        .execute(operation)
        .await
}
