//! Browser capability seam
//!
//! The pipeline depends on this minimal capability set — launch a
//! session, navigate, evaluate a script, close — not on any particular
//! automation provider. Implementations:
//! - `ChromiumBrowser` (`chromium.rs`): drives a real headless Chromium
//! - `StaticBrowser` (below): canned pages for tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors from browser automation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("script evaluation failed: {0}")]
    Evaluation(String),
}

/// Launches browser sessions.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    /// Acquire a fresh page session.
    async fn launch(&self) -> Result<Box<dyn PageSession>, BrowserError>;
}

/// One live page in a browser session.
///
/// The caller owns release: `close` must be invoked on every exit path.
#[async_trait]
pub trait PageSession: Send {
    /// Navigate to `url` and wait for the content to settle.
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Evaluate a script in the page and return its JSON result.
    async fn evaluate(&mut self, script: &str) -> Result<Value, BrowserError>;

    /// Close the session, releasing the underlying browser.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Mock provider for testing — serves canned evaluation payloads per URL.
///
/// A page with no canned payload evaluates to JSON `null`, which is what
/// a `querySelector` miss produces in a real page.
#[derive(Default)]
pub struct StaticBrowser {
    /// url → canned evaluation payload
    pages: HashMap<String, Value>,
    /// urls whose navigation fails
    unreachable: HashSet<String>,
    fail_launch: bool,
    launches: AtomicUsize,
    released: Arc<AtomicBool>,
}

impl StaticBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a browser whose launch always fails.
    pub fn failing_launch() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    /// Register the evaluation payload served at `url`.
    pub fn with_page(mut self, url: impl Into<String>, payload: Value) -> Self {
        self.pages.insert(url.into(), payload);
        self
    }

    /// Make navigation to `url` fail.
    pub fn with_unreachable(mut self, url: impl Into<String>) -> Self {
        self.unreachable.insert(url.into());
        self
    }

    /// How many sessions were launched.
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Whether the most recent session was closed.
    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserProvider for StaticBrowser {
    async fn launch(&self) -> Result<Box<dyn PageSession>, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch(
                "static browser configured to fail launch".to_string(),
            ));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.released.store(false, Ordering::SeqCst);
        Ok(Box::new(StaticPage {
            pages: self.pages.clone(),
            unreachable: self.unreachable.clone(),
            current: None,
            released: Arc::clone(&self.released),
        }))
    }
}

struct StaticPage {
    pages: HashMap<String, Value>,
    unreachable: HashSet<String>,
    current: Option<String>,
    released: Arc<AtomicBool>,
}

#[async_trait]
impl PageSession for StaticPage {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        if self.unreachable.contains(url) {
            return Err(BrowserError::Navigation(format!("unreachable: {url}")));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, _script: &str) -> Result<Value, BrowserError> {
        let url = self
            .current
            .as_ref()
            .ok_or_else(|| BrowserError::Evaluation("no page loaded".to_string()))?;
        Ok(self.pages.get(url).cloned().unwrap_or(Value::Null))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn static_browser_serves_canned_payloads() {
        let browser = StaticBrowser::new().with_page("http://example/list", json!(["a"]));

        let mut page = browser.launch().await.unwrap();
        page.goto("http://example/list").await.unwrap();
        assert_eq!(page.evaluate("anything").await.unwrap(), json!(["a"]));
    }

    #[tokio::test]
    async fn unknown_page_evaluates_to_null() {
        let browser = StaticBrowser::new();
        let mut page = browser.launch().await.unwrap();
        page.goto("http://example/missing").await.unwrap();
        assert_eq!(page.evaluate("anything").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn failing_launch_reports_launch_error() {
        let browser = StaticBrowser::failing_launch();
        let err = browser.launch().await.err().unwrap();
        assert!(matches!(err, BrowserError::Launch(_)));
    }

    #[tokio::test]
    async fn close_marks_the_session_released() {
        let browser = StaticBrowser::new();
        let mut page = browser.launch().await.unwrap();
        assert!(!browser.released());
        page.close().await.unwrap();
        assert!(browser.released());
    }
}
