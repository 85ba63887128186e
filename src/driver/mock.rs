//! Mock driver implementation for testing
//!
//! This module provides scriptable mock implementations of the driver traits
//! for development and testing. Elements are registered up front; failures can
//! be queued per operation and are returned before the normal behaviour.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::locator::{ElementHandle, Locator};
use super::traits::{ContextSwitching, Driver, DriverFactory, Platform, SessionRequest};
use crate::error::{DriverError, DriverResult, FailureKind};

/// Driver operation, used to queue failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Find,
    Click,
    Clear,
    SendKeys,
    Text,
    Displayed,
    Enabled,
    SetContext,
    SwitchFrame,
    Quit,
}

#[derive(Debug, Clone)]
struct MockElement {
    locator: Locator,
    displayed: bool,
    enabled: bool,
    text: String,
    /// Lookups that report the element as absent before it appears
    hidden_lookups: u32,
}

#[derive(Debug, Default)]
struct MockState {
    elements: HashMap<String, MockElement>,
    order: Vec<String>,
    failures: HashMap<MockOp, VecDeque<DriverError>>,
    calls: HashMap<MockOp, usize>,
    clicks: Vec<String>,
    typed: HashMap<String, String>,
    contexts: Option<Vec<String>>,
    current_context: String,
    frame: Option<String>,
}

/// Mock automation driver
#[derive(Debug)]
pub struct MockDriver {
    id: String,
    platform: Platform,
    state: Mutex<MockState>,
    quit: AtomicBool,
}

impl MockDriver {
    /// Create a new mock driver without context support
    pub fn new(platform: Platform) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            platform,
            state: Mutex::new(MockState {
                current_context: "NATIVE_APP".to_string(),
                ..Default::default()
            }),
            quit: AtomicBool::new(false),
        }
    }

    /// Create a mock driver exposing the given context handles
    pub fn with_contexts(platform: Platform, handles: &[&str]) -> Self {
        let driver = Self::new(platform);
        driver.state().contexts = Some(handles.iter().map(|h| h.to_string()).collect());
        driver
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-update
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Unique id of this driver instance
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register a displayed, enabled element and return its handle
    pub fn add_element(&self, locator: Locator, text: &str) -> ElementHandle {
        let id = format!("el-{}", Uuid::new_v4().simple());
        let mut state = self.state();
        state.elements.insert(
            id.clone(),
            MockElement {
                locator: locator.clone(),
                displayed: true,
                enabled: true,
                text: text.to_string(),
                hidden_lookups: 0,
            },
        );
        state.order.push(id.clone());
        ElementHandle::new(id, Some(locator))
    }

    /// Make an element's lookups fail with `NotFound` for the first `lookups` calls
    pub fn appear_after(&self, element: &ElementHandle, lookups: u32) {
        if let Some(el) = self.state().elements.get_mut(element.id()) {
            el.hidden_lookups = lookups;
        }
    }

    pub fn set_displayed(&self, element: &ElementHandle, displayed: bool) {
        if let Some(el) = self.state().elements.get_mut(element.id()) {
            el.displayed = displayed;
        }
    }

    pub fn set_enabled(&self, element: &ElementHandle, enabled: bool) {
        if let Some(el) = self.state().elements.get_mut(element.id()) {
            el.enabled = enabled;
        }
    }

    /// Queue a failure returned by the next call of `op`
    pub fn fail_next(&self, op: MockOp, error: DriverError) {
        self.state().failures.entry(op).or_default().push_back(error);
    }

    /// Queue the same failure for the next `times` calls of `op`
    pub fn fail_times(&self, op: MockOp, kind: FailureKind, times: usize) {
        for i in 0..times {
            self.fail_next(op, DriverError::new(kind, format!("scripted failure #{}", i + 1)));
        }
    }

    /// Number of calls made to `op`
    pub fn calls(&self, op: MockOp) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    /// Ids of clicked elements, in order
    pub fn clicks(&self) -> Vec<String> {
        self.state().clicks.clone()
    }

    /// Current value typed into an element
    pub fn typed_text(&self, element: &ElementHandle) -> Option<String> {
        self.state().typed.get(element.id()).cloned()
    }

    /// Currently selected frame element id
    pub fn frame(&self) -> Option<String> {
        self.state().frame.clone()
    }

    pub fn is_quit(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }

    /// Count the call and pop any scripted failure
    fn enter(&self, op: MockOp) -> DriverResult<()> {
        let mut state = self.state();
        *state.calls.entry(op).or_insert(0) += 1;
        match state.failures.get_mut(&op).and_then(|q| q.pop_front()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn with_element<T>(
        &self,
        element: &ElementHandle,
        f: impl FnOnce(&mut MockElement) -> T,
    ) -> DriverResult<T> {
        let mut state = self.state();
        state
            .elements
            .get_mut(element.id())
            .map(f)
            .ok_or_else(|| DriverError::stale(format!("element {} is no longer attached", element.id())))
    }
}

#[async_trait]
impl Driver for MockDriver {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn find_element(&self, locator: &Locator) -> DriverResult<ElementHandle> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::not_found(format!("no element matches {}", locator)))
    }

    async fn find_elements(&self, locator: &Locator) -> DriverResult<Vec<ElementHandle>> {
        self.enter(MockOp::Find)?;
        let mut state = self.state();
        let ids: Vec<String> = state
            .order
            .iter()
            .filter(|id| state.elements.get(*id).is_some_and(|el| &el.locator == locator))
            .cloned()
            .collect();

        let mut found = Vec::new();
        for id in ids {
            if let Some(el) = state.elements.get_mut(&id) {
                if el.hidden_lookups > 0 {
                    el.hidden_lookups -= 1;
                    continue;
                }
                found.push(ElementHandle::new(id, Some(locator.clone())));
            }
        }
        Ok(found)
    }

    async fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.enter(MockOp::Click)?;
        let interactable = self.with_element(element, |el| el.displayed && el.enabled)?;
        if !interactable {
            return Err(DriverError::not_interactable(format!("element {} cannot be clicked", element.id())));
        }
        self.state().clicks.push(element.id().to_string());
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> DriverResult<()> {
        self.enter(MockOp::Clear)?;
        self.with_element(element, |_| ())?;
        self.state().typed.remove(element.id());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()> {
        self.enter(MockOp::SendKeys)?;
        let enabled = self.with_element(element, |el| el.enabled)?;
        if !enabled {
            return Err(DriverError::not_interactable(format!("element {} is disabled", element.id())));
        }
        self.state()
            .typed
            .entry(element.id().to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        self.enter(MockOp::Text)?;
        self.with_element(element, |el| el.text.clone())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.enter(MockOp::Displayed)?;
        self.with_element(element, |el| el.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.enter(MockOp::Enabled)?;
        self.with_element(element, |el| el.enabled)
    }

    async fn switch_to_frame(&self, frame: Option<&ElementHandle>) -> DriverResult<()> {
        self.enter(MockOp::SwitchFrame)?;
        let frame = match frame {
            Some(element) => {
                self.with_element(element, |_| ()).map_err(|_| {
                    DriverError::new(FailureKind::NoSuchFrame, format!("frame {} is gone", element.id()))
                })?;
                Some(element.id().to_string())
            }
            None => None,
        };
        self.state().frame = frame;
        Ok(())
    }

    async fn quit(&self) -> DriverResult<()> {
        self.enter(MockOp::Quit)?;
        self.quit.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn context_switching(&self) -> Option<&dyn ContextSwitching> {
        if self.state().contexts.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl ContextSwitching for MockDriver {
    async fn context_handles(&self) -> DriverResult<Vec<String>> {
        Ok(self.state().contexts.clone().unwrap_or_default())
    }

    async fn current_context(&self) -> DriverResult<String> {
        Ok(self.state().current_context.clone())
    }

    async fn set_context(&self, handle: &str) -> DriverResult<()> {
        self.enter(MockOp::SetContext)?;
        let mut state = self.state();
        let known = state
            .contexts
            .as_ref()
            .is_some_and(|handles| handles.iter().any(|h| h == handle));
        if !known {
            return Err(DriverError::new(
                FailureKind::NoSuchContext,
                format!("context {} is not available", handle),
            ));
        }
        state.current_context = handle.to_string();
        Ok(())
    }
}

/// Mock driver factory
///
/// Hands out a preconfigured driver, or a fresh [`MockDriver`] per request,
/// and records every request it receives.
#[derive(Default)]
pub struct MockDriverFactory {
    driver: Option<Arc<MockDriver>>,
    failure: Option<DriverError>,
    requests: Mutex<Vec<SessionRequest>>,
    connected: Mutex<Vec<Arc<MockDriver>>>,
}

impl MockDriverFactory {
    /// Create a factory that builds a fresh driver for every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory that always returns `driver`
    pub fn with_driver(driver: Arc<MockDriver>) -> Self {
        Self {
            driver: Some(driver),
            ..Default::default()
        }
    }

    /// Create a factory whose connections always fail
    pub fn failing(error: DriverError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<SessionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drivers handed out so far
    pub fn connected(&self) -> Vec<Arc<MockDriver>> {
        self.connected.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn connect(&self, request: &SessionRequest) -> DriverResult<Arc<dyn Driver>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let driver = match &self.driver {
            Some(driver) => driver.clone(),
            None => Arc::new(MockDriver::new(request.platform)),
        };
        self.connected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(driver.clone());
        Ok(driver)
    }
}
