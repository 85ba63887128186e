//! End-to-end integration tests
//!
//! These tests drive complete flows through the public API, from session start
//! through screen interaction to teardown, against the mock driver.

mod common;

use async_trait::async_trait;
use common::start_session;
use screen_automation::driver::mock::{MockDriver, MockOp};
use screen_automation::driver::{Locator, Platform};
use screen_automation::error::{DriverError, FailureKind};
use screen_automation::screen::{Screen, ScreenContext};
use screen_automation::session::Context;
use std::sync::Arc;
use std::time::Duration;

struct LoginScreen {
    ctx: ScreenContext,
}

#[async_trait]
impl Screen for LoginScreen {
    fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    fn marker(&self) -> Locator {
        Locator::id("login-button")
    }
}

impl LoginScreen {
    async fn login(&self, user: &str, password: &str) -> screen_automation::Result<()> {
        let executor = self.ctx.executor();
        executor.type_text(Locator::id("user-name"), user).await?;
        executor.type_text(Locator::id("password"), password).await?;
        executor.click(Locator::id("login-button")).await
    }
}

/// Test 1: a stale click on a web session succeeds on the second attempt
#[tokio::test]
async fn test_web_click_recovers_from_stale_reference() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new(Platform::Web));
    driver.add_element(Locator::id("login-button"), "Login");
    driver.fail_times(MockOp::Click, FailureKind::StaleReference, 1);

    let (manager, session) =
        start_session(driver.clone(), Platform::Web, Duration::from_secs(10)).await?;
    assert_eq!(session.default_wait().timeout(), Duration::from_secs(10));

    manager.executor()?.click(Locator::id("login-button")).await?;

    assert_eq!(driver.calls(MockOp::Click), 2);
    assert_eq!(driver.clicks().len(), 1);

    manager.end_session().await?;
    assert!(driver.is_quit());
    Ok(())
}

/// Test 2: hybrid app login through the embedded webview
#[tokio::test]
async fn test_webview_login_flow() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::with_contexts(
        Platform::Android,
        &["NATIVE_APP", "WEBVIEW_com.saucelabs.mydemoapp.android"],
    ));
    driver.add_element(Locator::accessibility_id("View menu"), "");
    driver.add_element(Locator::accessibility_id("Menu Item WebView"), "WebView");
    let user = driver.add_element(Locator::id("user-name"), "");
    let password = driver.add_element(Locator::id("password"), "");
    let login_button = driver.add_element(Locator::id("login-button"), "Login");
    driver.add_element(Locator::css(".title"), "Products");
    driver.fail_next(MockOp::SendKeys, DriverError::not_interactable("keyboard opening"));

    let (manager, _session) =
        start_session(driver.clone(), Platform::Android, Duration::from_millis(500)).await?;
    let screen = LoginScreen { ctx: manager.screen()? };

    let executor = screen.context().executor();
    executor.click(Locator::accessibility_id("View menu")).await?;
    executor.click(Locator::accessibility_id("Menu Item WebView")).await?;

    let handle = screen.context().contexts().switch_to_webview().await?;
    assert_eq!(handle, "WEBVIEW_com.saucelabs.mydemoapp.android");

    assert!(screen.is_displayed().await?);
    screen.login("standard_user", "secret_sauce").await?;

    assert_eq!(driver.typed_text(&user).as_deref(), Some("standard_user"));
    assert_eq!(driver.typed_text(&password).as_deref(), Some("secret_sauce"));
    assert_eq!(driver.clicks().last().map(String::as_str), Some(login_button.id()));
    assert_eq!(executor.read_text(Locator::css(".title")).await?, "Products");

    screen.context().contexts().switch_to_native().await?;
    assert_eq!(screen.context().contexts().current(), Context::Native);

    manager.end_session().await?;
    Ok(())
}

/// Test 3: payment form inside an iframe
#[tokio::test]
async fn test_iframe_form() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new(Platform::Web));
    driver.add_element(Locator::css("iframe#card-frame"), "");
    let card = driver.add_element(Locator::name("cardnumber"), "");

    let (manager, _session) =
        start_session(driver.clone(), Platform::Web, Duration::from_millis(200)).await?;
    let ctx = manager.screen()?;

    ctx.frames()
        .switch_to_frame_located(&Locator::css("iframe#card-frame"))
        .await?;
    assert!(driver.frame().is_some());

    ctx.executor()
        .type_text(Locator::name("cardnumber"), "4242 4242 4242 4242")
        .await?;
    assert_eq!(driver.typed_text(&card).as_deref(), Some("4242 4242 4242 4242"));

    ctx.frames().switch_to_default_content().await?;
    assert_eq!(driver.frame(), None);
    Ok(())
}

/// Test 4: a product list that renders after a few lookups
#[tokio::test]
async fn test_late_product_list() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new(Platform::Ios));
    let item_locator = Locator::accessibility_id("store item");
    let first = driver.add_element(item_locator.clone(), "Sauce Labs Backpack");
    let second = driver.add_element(item_locator.clone(), "Sauce Labs Bike Light");
    driver.appear_after(&first, 2);
    driver.appear_after(&second, 2);

    let (manager, _session) =
        start_session(driver.clone(), Platform::Ios, Duration::from_millis(500)).await?;
    let finder = manager.finder()?;

    let found = finder.find(&item_locator).await?;
    assert_eq!(found.id(), first.id());

    let items = finder.get_all_immediate(&item_locator).await?;
    assert_eq!(items.len(), 2);

    let visible = finder.find_all(&items).await?;
    assert!(!visible.timed_out());
    assert_eq!(visible.into_elements().len(), 2);
    Ok(())
}
