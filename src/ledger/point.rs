//! A single price observation

use serde::{Deserialize, Serialize};

/// One timestamped price observation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observed price. Non-negative: produced only by currency parsing,
    /// which cannot yield a sign.
    pub price: f64,
    /// Observation time as epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub observed_at: i64,
}

impl PricePoint {
    pub fn new(price: f64, observed_at: i64) -> Self {
        Self { price, observed_at }
    }

    /// Build a point observed now.
    pub fn now(price: f64) -> Self {
        Self::new(price, chrono::Utc::now().timestamp_millis())
    }
}
