//! The scrape pipeline: locate an item on the catalog site, record its price
//!
//! A straight-line state machine over the browser capability seam. The
//! session acquired at launch is closed on every exit path: `run` drives
//! the fallible stages through `drive` and closes before surfacing the
//! result. Matching and currency parsing are ordinary data processing
//! here, not page-side logic.

use super::browser::{BrowserProvider, PageSession};
use crate::error::{WatchError, WatchResult};
use crate::key::EntityKey;
use crate::ledger::{LedgerDirectory, PricePoint};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collects every item-title anchor on the listing page, in document order.
const LISTING_ANCHORS_JS: &str = r#"
Array.from(document.querySelectorAll('h3 a')).map(a => ({
    text: a.textContent || '',
    title: a.getAttribute('title') || a.textContent || '',
    href: a.href,
}))
"#;

/// Reads the price element's text on a detail page; null when absent.
const PRICE_TEXT_JS: &str = r#"
(() => {
    const el = document.querySelector('.price_color');
    return el ? (el.textContent || '') : null;
})()
"#;

/// One item-title anchor as extracted from the listing page.
#[derive(Debug, Deserialize)]
struct ListingAnchor {
    text: String,
    title: String,
    href: String,
}

/// A listing entry matched against the query. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct CatalogMatch {
    pub display_title: String,
    pub detail_url: String,
}

/// Successful pipeline output.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Display title of the matched catalog entry.
    pub found_title: String,
    /// Verbatim price element text, e.g. `£51.77`.
    pub raw_price: String,
    /// Parsed decimal price.
    pub price: f64,
}

/// Drives a browser session through locate → match → extract → persist.
pub struct ScrapePipeline {
    browser: Arc<dyn BrowserProvider>,
    directory: Arc<LedgerDirectory>,
    listing_url: String,
}

impl ScrapePipeline {
    pub fn new(
        browser: Arc<dyn BrowserProvider>,
        directory: Arc<LedgerDirectory>,
        listing_url: impl Into<String>,
    ) -> Self {
        Self {
            browser,
            directory,
            listing_url: listing_url.into(),
        }
    }

    /// Scrape the catalog for `raw_query` and record the observed price.
    ///
    /// Failures come back as [`WatchError`] values; nothing is thrown past
    /// this boundary, and the browser session is released regardless of
    /// which stage failed.
    pub async fn run(&self, raw_query: &str) -> WatchResult<ScrapeOutcome> {
        // Invalid input must not burn a browser session.
        let key = EntityKey::normalize(raw_query)?;
        info!(query = raw_query, key = %key, "scrape requested");

        let mut page = self
            .browser
            .launch()
            .await
            .map_err(WatchError::Infrastructure)?;

        let outcome = self.drive(page.as_mut(), raw_query, &key).await;

        // Release always runs, success or failure.
        if let Err(err) = page.close().await {
            warn!(error = %err, "browser session close failed");
        }

        outcome
    }

    async fn drive(
        &self,
        page: &mut dyn PageSession,
        raw_query: &str,
        key: &EntityKey,
    ) -> WatchResult<ScrapeOutcome> {
        page.goto(&self.listing_url)
            .await
            .map_err(WatchError::Infrastructure)?;

        let payload = page
            .evaluate(LISTING_ANCHORS_JS)
            .await
            .map_err(WatchError::Infrastructure)?;
        let anchors: Vec<ListingAnchor> = serde_json::from_value(payload)
            .map_err(|e| WatchError::Extraction(format!("listing anchors unreadable: {e}")))?;
        debug!(anchors = anchors.len(), "listing collected");

        let matched = match_listing(&anchors, key)
            .ok_or_else(|| WatchError::NotFound(raw_query.to_string()))?;
        info!(title = %matched.display_title, "catalog match");

        page.goto(&matched.detail_url)
            .await
            .map_err(WatchError::Infrastructure)?;

        let payload = page
            .evaluate(PRICE_TEXT_JS)
            .await
            .map_err(WatchError::Infrastructure)?;
        let raw_price = serde_json::from_value::<Option<String>>(payload)
            .map_err(|e| WatchError::Extraction(format!("price payload unreadable: {e}")))?
            .ok_or_else(|| WatchError::Extraction("price element missing".to_string()))?;

        let price = parse_price(&raw_price).ok_or_else(|| {
            WatchError::Extraction(format!("unparseable price text {raw_price:?}"))
        })?;

        // Only a fully extracted price reaches the ledger, so a failed
        // scrape never creates state for its key.
        let ledger = self.directory.resolve(key)?;
        ledger.append(&PricePoint::now(price))?;
        info!(key = %key, price, "price recorded");

        Ok(ScrapeOutcome {
            found_title: matched.display_title,
            raw_price,
            price,
        })
    }
}

/// First anchor (document order) whose visible text contains the key as a
/// case-insensitive substring. No relevance scoring.
fn match_listing(anchors: &[ListingAnchor], key: &EntityKey) -> Option<CatalogMatch> {
    anchors
        .iter()
        .find(|a| a.text.to_lowercase().contains(key.as_str()))
        .map(|a| CatalogMatch {
            display_title: a.title.clone(),
            detail_url: a.href.clone(),
        })
}

/// Parse a currency string: strip every character that is not an ASCII
/// digit or decimal point, then parse the remainder as a decimal.
fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
