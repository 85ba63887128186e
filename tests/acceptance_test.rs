//! Behavioural acceptance tests
//!
//! Each test pins one externally observable guarantee of the retry engine,
//! the finder, the executor, the session manager or the context switcher.

mod common;

use common::{start_session, CHROMEDRIVER};
use screen_automation::driver::mock::{MockDriver, MockOp};
use screen_automation::driver::{Locator, Platform};
use screen_automation::retry::{execute_with_retry, Backoff, RetryPolicy};
use screen_automation::session::{Context, SessionManager};
use screen_automation::{DriverError, Error, FailureKind, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const RECOVERABLE: &[FailureKind] = &[FailureKind::StaleReference, FailureKind::ClickIntercepted];

// ============= Retry engine =============

#[tokio::test]
async fn test_recoverable_failure_uses_whole_budget() {
    for max_retries in 0..=4 {
        let calls = AtomicU32::new(0);
        let result: Result<()> = execute_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::from(DriverError::click_intercepted("toast overlay"))) }
            },
            max_retries,
            RECOVERABLE,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
        assert!(matches!(result, Err(Error::RetriesExhausted { .. })));
    }
}

#[tokio::test]
async fn test_unlisted_failure_is_not_retried() {
    let calls = AtomicU32::new(0);
    let result: Result<()> = execute_with_retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::from(DriverError::not_interactable("covered by keyboard"))) }
        },
        5,
        RECOVERABLE,
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let err = assert_err!(result);
    assert!(matches!(err, Error::UnhandledFailure { .. }));
}

#[tokio::test]
async fn test_success_on_kth_attempt() {
    for k in 1..=4u32 {
        let calls = AtomicU32::new(0);
        let value = assert_ok!(
            execute_with_retry(
                || {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if attempt < k {
                            Err(Error::from(DriverError::stale("re-rendered")))
                        } else {
                            Ok(format!("attempt {}", attempt))
                        }
                    }
                },
                3,
                RECOVERABLE,
            )
            .await
        );

        assert_eq!(value, format!("attempt {}", k));
        assert_eq!(calls.load(Ordering::SeqCst), k);
    }
}

#[tokio::test]
async fn test_backoff_spaces_attempts() {
    let policy = RetryPolicy::new(RECOVERABLE)
        .with_max_retries(2)
        .with_backoff(Backoff::Fixed(Duration::from_millis(20)));

    let started = std::time::Instant::now();
    let result: Result<()> = policy
        .execute(|| async { Err(Error::from(DriverError::stale("detached"))) })
        .await;

    assert!(matches!(result, Err(Error::RetriesExhausted { attempts: 3, .. })));
    assert!(started.elapsed() >= Duration::from_millis(40));
}

// ============= Finder and executor =============

#[tokio::test]
async fn test_find_all_never_visible_is_empty() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new(Platform::Android));
    let hidden = driver.add_element(Locator::accessibility_id("cart badge"), "2");
    driver.set_displayed(&hidden, false);

    let (manager, _session) =
        start_session(driver, Platform::Android, Duration::from_millis(50)).await?;
    let outcome = manager.finder()?.find_all(&[hidden]).await?;

    assert!(outcome.timed_out());
    assert!(outcome.into_elements().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_is_enabled_on_missing_element_is_false() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new(Platform::Web));
    let (manager, _session) =
        start_session(driver.clone(), Platform::Web, Duration::from_millis(50)).await?;

    let enabled = manager.executor()?.is_enabled(Locator::id("checkout")).await?;
    assert!(!enabled);
    assert!(driver.calls(MockOp::Find) >= 1);
    assert_eq!(driver.calls(MockOp::Enabled), 0);
    Ok(())
}

// ============= Session manager =============

#[tokio::test]
async fn test_active_session_is_the_same_handle() -> anyhow::Result<()> {
    let manager = SessionManager::mock();
    assert!(matches!(manager.active_session(), Err(Error::NotInitialized)));

    manager.start_web_session(CHROMEDRIVER, None).await?;
    let first = manager.active_session()?;
    let second = manager.active_session()?;
    assert!(Arc::ptr_eq(&first, &second));

    manager.end_session().await?;
    assert!(matches!(manager.active_session(), Err(Error::NotInitialized)));
    Ok(())
}

// ============= Context switching =============

#[tokio::test]
async fn test_webview_selection() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_contexts(
        Platform::Android,
        &["NATIVE_APP", "WEBVIEW_42"],
    ));
    let (manager, session) =
        start_session(driver, Platform::Android, Duration::from_secs(1)).await?;

    let handle = manager.context_switcher()?.switch_to_webview().await?;
    assert_eq!(handle, "WEBVIEW_42");
    assert_eq!(session.context(), Context::WebView("WEBVIEW_42".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_missing_webview() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_contexts(Platform::Android, &["NATIVE_APP"]));
    let (manager, session) =
        start_session(driver, Platform::Android, Duration::from_secs(1)).await?;

    let err = assert_err!(manager.context_switcher()?.switch_to_webview().await);
    assert!(matches!(err, Error::NoWebViewContext { .. }));
    assert_eq!(session.context(), Context::Native);
    Ok(())
}
