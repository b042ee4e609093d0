//! Chromium-backed browser sessions (Chrome DevTools Protocol)

use super::browser::{BrowserError, BrowserProvider, PageSession};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

/// Launches headless Chromium sessions.
pub struct ChromiumBrowser;

impl ChromiumBrowser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChromiumBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserProvider for ChromiumBrowser {
    async fn launch(&self) -> Result<Box<dyn PageSession>, BrowserError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The CDP event stream must be pumped for the session to make
        // progress; it lives until the session closes.
        let driver: JoinHandle<()> = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        debug!("chromium session launched");
        Ok(Box::new(ChromiumPage {
            browser,
            page,
            driver,
        }))
    }
}

struct ChromiumPage {
    browser: CdpBrowser,
    page: Page,
    driver: JoinHandle<()>,
}

#[async_trait]
impl PageSession for ChromiumPage {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let result = self
            .browser
            .close()
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))
            .map(|_| ());
        let _ = self.browser.wait().await;
        self.driver.abort();
        debug!("chromium session closed");
        result
    }
}
