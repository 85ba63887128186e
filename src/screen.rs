//! Screen composition
//!
//! A screen object holds a [`ScreenContext`] and implements [`Screen`];
//! the context carries every collaborator a screen needs for one session.

use async_trait::async_trait;
use std::sync::Arc;

use crate::actions::{ActionExecutor, ElementFinder};
use crate::config::Config;
use crate::context::{ContextSwitcher, FrameSwitcher};
use crate::driver::Locator;
use crate::error::Result;
use crate::session::Session;

/// Finder, executor and switchers bound to one session
#[derive(Debug, Clone)]
pub struct ScreenContext {
    session: Arc<Session>,
    finder: ElementFinder,
    executor: ActionExecutor,
    contexts: ContextSwitcher,
    frames: FrameSwitcher,
}

impl ScreenContext {
    /// Context with the default action retry settings
    pub fn new(session: Arc<Session>) -> Self {
        let executor = ActionExecutor::new(session.clone());
        Self::with_executor(session, executor)
    }

    /// Context whose executor follows the retry settings in `config`
    pub fn from_config(session: Arc<Session>, config: &Config) -> Self {
        let executor = ActionExecutor::from_config(session.clone(), config);
        Self::with_executor(session, executor)
    }

    fn with_executor(session: Arc<Session>, executor: ActionExecutor) -> Self {
        Self {
            finder: ElementFinder::new(session.clone()),
            contexts: ContextSwitcher::new(session.clone()),
            frames: FrameSwitcher::new(session.clone()),
            executor,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn finder(&self) -> &ElementFinder {
        &self.finder
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    pub fn contexts(&self) -> &ContextSwitcher {
        &self.contexts
    }

    pub fn frames(&self) -> &FrameSwitcher {
        &self.frames
    }
}

/// A page or view of the application under test
#[async_trait]
pub trait Screen: Send + Sync {
    fn context(&self) -> &ScreenContext;

    /// Element whose visibility identifies this screen
    fn marker(&self) -> Locator;

    /// Whether this screen is currently shown
    async fn is_displayed(&self) -> Result<bool> {
        self.context().executor().is_visible(self.marker()).await
    }
}
