//! pricewatch: catalog price tracking with per-item durable ledgers
//!
//! Scrapes a catalog site for a named item through a headless browser,
//! records every observed price as a timestamped point in that item's own
//! SQLite ledger, and explains the recent trend via an external
//! text-generation service.
//!
//! # Core Concepts
//!
//! - **EntityKey**: normalized identity of one tracked item
//! - **PriceLedger**: append-only, per-key price history (one store per key)
//! - **ScrapePipeline**: browser-driven locate → match → extract → persist
//! - **TrendSummarizer**: bounded recent history → natural-language summary
//!
//! The pipeline and the summarizer never touch each other; they meet only
//! at the ledger.

pub mod api;
pub mod config;
pub mod error;
pub mod key;
pub mod ledger;
pub mod scrape;
pub mod summary;

pub use api::{ScrapeReport, WatchApi};
pub use config::WatchConfig;
pub use error::{WatchError, WatchResult};
pub use key::{EntityKey, InvalidQuery};
pub use ledger::{LedgerDirectory, PriceLedger, PricePoint, StorageError, StorageResult};
pub use scrape::{
    BrowserError, BrowserProvider, CatalogMatch, ChromiumBrowser, PageSession, ScrapeOutcome,
    ScrapePipeline, StaticBrowser,
};
pub use summary::{
    GenerateError, HttpGenerator, MockGenerator, SummaryResult, TextGenerator, TrendSummarizer,
    HISTORY_WINDOW, NO_HISTORY_RESPONSE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
