//! Transport-independent API layer
//!
//! `WatchApi` is the single entry point for consumer-facing operations.
//! Transports (the CLI shell, or any HTTP front put in front of it) call
//! these methods and render the report types — they never reach into the
//! pipeline, summarizer, or directory directly.

use crate::config::WatchConfig;
use crate::error::WatchResult;
use crate::key::EntityKey;
use crate::ledger::{LedgerDirectory, PricePoint};
use crate::scrape::{BrowserProvider, ScrapeOutcome, ScrapePipeline};
use crate::summary::{SummaryResult, TextGenerator, TrendSummarizer};
use serde::Serialize;
use std::sync::Arc;

/// Single entry point for all consumer-facing operations.
pub struct WatchApi {
    directory: Arc<LedgerDirectory>,
    pipeline: ScrapePipeline,
    summarizer: TrendSummarizer,
}

impl WatchApi {
    /// Wire the core against injected browser and generation capabilities.
    pub fn new(
        config: &WatchConfig,
        browser: Arc<dyn BrowserProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let directory = Arc::new(LedgerDirectory::new(&config.data_dir));
        Self::with_directory(directory, browser, generator, &config.catalog_url)
    }

    /// Wire against an existing directory (tests use the in-memory one).
    pub fn with_directory(
        directory: Arc<LedgerDirectory>,
        browser: Arc<dyn BrowserProvider>,
        generator: Arc<dyn TextGenerator>,
        catalog_url: &str,
    ) -> Self {
        let pipeline = ScrapePipeline::new(browser, Arc::clone(&directory), catalog_url);
        let summarizer = TrendSummarizer::new(generator, Arc::clone(&directory));
        Self {
            directory,
            pipeline,
            summarizer,
        }
    }

    /// Scrape the catalog for `query` and record the observed price.
    pub async fn scrape(&self, query: &str) -> WatchResult<ScrapeOutcome> {
        self.pipeline.run(query).await
    }

    /// Explain the recent price trend for `query`.
    pub async fn summarize(&self, query: &str) -> WatchResult<SummaryResult> {
        self.summarizer.summarize(query).await
    }

    /// Read up to `limit` recorded points for `query`, most recent first.
    pub fn recent(&self, query: &str, limit: usize) -> WatchResult<Vec<PricePoint>> {
        let key = EntityKey::normalize(query)?;
        let ledger = self.directory.resolve(&key)?;
        Ok(ledger.recent(limit)?)
    }
}

/// Wire shape of a scrape result, as the transport reports it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeReport {
    pub fn from_result(result: &WatchResult<ScrapeOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                found_title: Some(outcome.found_title.clone()),
                price: Some(outcome.raw_price.clone()),
                error: None,
            },
            Err(err) => Self {
                success: false,
                found_title: None,
                price: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchError;

    #[test]
    fn success_report_carries_title_and_raw_price() {
        let result = Ok(ScrapeOutcome {
            found_title: "A Light in the Attic".to_string(),
            raw_price: "£51.77".to_string(),
            price: 51.77,
        });

        let report = ScrapeReport::from_result(&result);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["foundTitle"], "A Light in the Attic");
        assert_eq!(json["price"], "£51.77");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_report_carries_only_the_error() {
        let result: WatchResult<ScrapeOutcome> =
            Err(WatchError::NotFound("zzz-book".to_string()));

        let report = ScrapeReport::from_result(&result);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("zzz-book"));
        assert!(json.get("foundTitle").is_none());
    }
}
