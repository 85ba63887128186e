//! Native / webview context switcher

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::driver::ContextSwitching;
use crate::error::{Error, Result};
use crate::session::{Context, Session, NATIVE_CONTEXT, WEBVIEW_MARKER};

/// Switches a session between native and webview contexts
#[derive(Debug, Clone)]
pub struct ContextSwitcher {
    session: Arc<Session>,
}

impl ContextSwitcher {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    fn capability(&self) -> Result<&dyn ContextSwitching> {
        self.session
            .driver()
            .context_switching()
            .ok_or(Error::UnsupportedContext(self.session.platform()))
    }

    /// Context handles the driver currently exposes
    pub async fn available(&self) -> Result<Vec<String>> {
        Ok(self.capability()?.context_handles().await?)
    }

    /// Switch to the first webview context and return its handle
    #[instrument(skip_all, fields(session = %self.session.id()))]
    pub async fn switch_to_webview(&self) -> Result<String> {
        let contexts = self.capability()?;
        let handles = contexts.context_handles().await?;
        debug!("Available contexts: {:?}", handles);

        let handle = match handles.iter().find(|h| h.contains(WEBVIEW_MARKER)) {
            Some(handle) => handle.clone(),
            None => return Err(Error::NoWebViewContext { available: handles }),
        };

        contexts.set_context(&handle).await?;
        self.session.set_context(Context::WebView(handle.clone()));
        info!("Switched to webview context {}", handle);
        Ok(handle)
    }

    /// Switch back to the native application context
    #[instrument(skip_all, fields(session = %self.session.id()))]
    pub async fn switch_to_native(&self) -> Result<()> {
        self.capability()?.set_context(NATIVE_CONTEXT).await?;
        self.session.set_context(Context::Native);
        info!("Switched to native context");
        Ok(())
    }

    /// Context recorded by the last successful switch
    pub fn current(&self) -> Context {
        self.session.context()
    }

    /// Context handle as reported by the driver
    pub async fn current_handle(&self) -> Result<String> {
        Ok(self.capability()?.current_context().await?)
    }
}
