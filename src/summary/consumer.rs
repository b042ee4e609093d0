//! Summary consumer: recent history → natural-language trend analysis

use super::generate::{GenerateError, TextGenerator};
use crate::error::{WatchError, WatchResult};
use crate::key::EntityKey;
use crate::ledger::LedgerDirectory;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// How many points feed one summary. The read path never paginates past
/// this window.
pub const HISTORY_WINDOW: usize = 10;

/// Fixed benign response for a key with no recorded points. A defined
/// empty state, not an error.
pub const NO_HISTORY_RESPONSE: &str =
    "I have no price history for this item yet. Run a scrape first.";

/// The generated explanation, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub response: String,
}

/// Reads a key's bounded recent history and asks the generation service
/// to explain the trend.
pub struct TrendSummarizer {
    generator: Arc<dyn TextGenerator>,
    directory: Arc<LedgerDirectory>,
}

impl TrendSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, directory: Arc<LedgerDirectory>) -> Self {
        Self {
            generator,
            directory,
        }
    }

    /// Summarize the recent price history for `raw_query`.
    ///
    /// An empty history short-circuits with [`NO_HISTORY_RESPONSE`] and
    /// performs no generation call. Generation failure surfaces as
    /// [`WatchError::Inference`]; the history itself remains intact.
    pub async fn summarize(&self, raw_query: &str) -> WatchResult<SummaryResult> {
        let key = EntityKey::normalize(raw_query)?;
        let ledger = self.directory.resolve(&key)?;
        let history = ledger.recent(HISTORY_WINDOW)?;

        if history.is_empty() {
            info!(key = %key, "no history, returning fixed response");
            return Ok(SummaryResult {
                response: NO_HISTORY_RESPONSE.to_string(),
            });
        }

        let serialized = serde_json::to_string(&history).map_err(GenerateError::Prompt)?;
        let system_context =
            format!("You are a retail price analyst. The user is tracking: {raw_query}");
        let user_prompt = format!(
            "Analyze this price history: {serialized}. Give a 2-sentence summary."
        );

        info!(key = %key, points = history.len(), "requesting trend summary");
        let response = self
            .generator
            .generate(&system_context, &user_prompt)
            .await
            .map_err(WatchError::Inference)?;

        Ok(SummaryResult { response })
    }
}
