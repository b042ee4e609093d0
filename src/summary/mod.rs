//! Summary consumer and its text-generation seam
//!
//! Reads the bounded recent history for a key and turns it into a
//! natural-language trend explanation via an injected generation client.
//! This path and the scrape pipeline only meet at the ledger.

mod consumer;
mod generate;

pub use consumer::{SummaryResult, TrendSummarizer, HISTORY_WINDOW, NO_HISTORY_RESPONSE};
pub use generate::{GenerateError, HttpGenerator, MockGenerator, TextGenerator};
