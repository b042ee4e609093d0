//! Error taxonomy
//!
//! Every stage converts its own failure into one of these kinds at the
//! boundary it owns; nothing downgrades a hard failure into a partial
//! success, and nothing retries. Timeouts are deliberately absent — if a
//! bounded-wait policy is introduced, it gets its own kind here rather
//! than hanging silently.

use crate::key::InvalidQuery;
use crate::ledger::StorageError;
use crate::scrape::BrowserError;
use crate::summary::GenerateError;
use thiserror::Error;

/// Failure kinds surfaced to callers.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Empty or whitespace-only input. A user error, not retried.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    /// Browser session unavailable or broken mid-flight.
    #[error("browser infrastructure failed: {0}")]
    Infrastructure(#[source] BrowserError),

    /// No catalog item matched; carries the original query for correction.
    #[error("no catalog item matches \"{0}\"")]
    NotFound(String),

    /// Listing or price payload missing/unparseable — page-structure drift.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Ledger append/read failed. Fatal for the call.
    #[error("ledger storage failed: {0}")]
    Storage(#[from] StorageError),

    /// External summarization call failed; history remains intact.
    #[error("summary generation failed: {0}")]
    Inference(#[from] GenerateError),
}

/// Result type for consumer-facing operations
pub type WatchResult<T> = Result<T, WatchError>;
