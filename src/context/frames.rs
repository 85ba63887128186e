//! Iframe switching for web documents

use std::sync::Arc;
use tracing::info;

use crate::actions::ElementFinder;
use crate::driver::{ElementHandle, Locator};
use crate::error::Result;
use crate::session::Session;

/// Moves the session's document focus into and out of iframes
#[derive(Debug, Clone)]
pub struct FrameSwitcher {
    session: Arc<Session>,
}

impl FrameSwitcher {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Enter the iframe backing `frame`
    pub async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()> {
        self.session.driver().switch_to_frame(Some(frame)).await?;
        info!("Switched to frame {}", frame);
        Ok(())
    }

    /// Wait for the iframe matching `locator`, then enter it
    pub async fn switch_to_frame_located(&self, locator: &Locator) -> Result<()> {
        let frame = ElementFinder::new(self.session.clone()).find(locator).await?;
        self.switch_to_frame(&frame).await
    }

    /// Return to the top-level document
    pub async fn switch_to_default_content(&self) -> Result<()> {
        self.session.driver().switch_to_frame(None).await?;
        info!("Switched to default content");
        Ok(())
    }
}
