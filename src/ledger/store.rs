//! SQLite-backed ledger for one entity key
//!
//! One database file per key, holding a single `price_history` table.
//! Thread-safe via internal mutex on the connection; because every
//! append/recent for a key goes through that key's one connection, all
//! operations against a key are linearized without any cross-key lock.

use super::point::PricePoint;
use crate::key::EntityKey;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The durable, append-only price history for exactly one entity key.
///
/// Owns its sequence exclusively: no other component mutates the table.
/// Points are retrievable most-recent first; a read never observes a
/// partially written point (appends are single bound INSERTs).
pub struct PriceLedger {
    key: EntityKey,
    conn: Mutex<Connection>,
}

impl PriceLedger {
    /// Open (or create) the ledger database for `key` at `path`.
    ///
    /// Schema creation is idempotent: reopening an existing ledger never
    /// reinitializes its data.
    pub fn open(key: EntityKey, path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            key,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory ledger (useful for testing)
    pub fn open_in_memory(key: EntityKey) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            key,
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS price_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                price REAL NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_price_history_timestamp
                ON price_history(timestamp);

            -- WAL so a reader never blocks behind a writer on the same file
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// The key this ledger belongs to.
    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// Durably persist one observation.
    ///
    /// On success the point is visible to every subsequent [`recent`]
    /// call on this ledger. A failed insert propagates; points are never
    /// silently dropped.
    ///
    /// [`recent`]: PriceLedger::recent
    pub fn append(&self, point: &PricePoint) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO price_history (price, timestamp) VALUES (?1, ?2)",
            params![point.price, point.observed_at],
        )?;
        Ok(())
    }

    /// Read up to `limit` observations, most recent first.
    ///
    /// Ordered by timestamp descending; identical timestamps fall back to
    /// append order, most recently appended first. An unpopulated ledger
    /// yields an empty vec, not an error.
    pub fn recent(&self, limit: usize) -> StorageResult<Vec<PricePoint>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT price, timestamp FROM price_history
             ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;

        let points = stmt
            .query_map(params![limit as i64], |row| {
                Ok(PricePoint {
                    price: row.get(0)?,
                    observed_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> PriceLedger {
        let key = EntityKey::normalize("test item").unwrap();
        PriceLedger::open_in_memory(key).unwrap()
    }

    #[test]
    fn empty_ledger_reads_empty_not_error() {
        let ledger = test_ledger();
        assert!(ledger.recent(10).unwrap().is_empty());
    }

    #[test]
    fn append_is_immediately_visible() {
        let ledger = test_ledger();
        ledger.append(&PricePoint::new(51.77, 1_000)).unwrap();

        let points = ledger.recent(10).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, 51.77);
        assert_eq!(points[0].observed_at, 1_000);
    }

    #[test]
    fn recent_orders_by_timestamp_descending() {
        let ledger = test_ledger();
        ledger.append(&PricePoint::new(10.0, 1_000)).unwrap();
        ledger.append(&PricePoint::new(12.0, 3_000)).unwrap();
        ledger.append(&PricePoint::new(11.0, 2_000)).unwrap();

        let points = ledger.recent(10).unwrap();
        let stamps: Vec<i64> = points.iter().map(|p| p.observed_at).collect();
        assert_eq!(stamps, vec![3_000, 2_000, 1_000]);
    }

    #[test]
    fn timestamp_ties_break_by_append_order_newest_first() {
        let ledger = test_ledger();
        ledger.append(&PricePoint::new(1.0, 5_000)).unwrap();
        ledger.append(&PricePoint::new(2.0, 5_000)).unwrap();
        ledger.append(&PricePoint::new(3.0, 5_000)).unwrap();

        let points = ledger.recent(10).unwrap();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn recent_never_exceeds_limit() {
        let ledger = test_ledger();
        for i in 0..15 {
            ledger.append(&PricePoint::new(i as f64, i)).unwrap();
        }

        assert_eq!(ledger.recent(10).unwrap().len(), 10);
        assert_eq!(ledger.recent(1).unwrap().len(), 1);
        // The window starts at the newest point.
        assert_eq!(ledger.recent(1).unwrap()[0].observed_at, 14);
    }

    #[test]
    fn reopen_preserves_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item.db");
        let key = EntityKey::normalize("item").unwrap();

        {
            let ledger = PriceLedger::open(key.clone(), &path).unwrap();
            ledger.append(&PricePoint::new(5.5, 100)).unwrap();
        }

        let reopened = PriceLedger::open(key, &path).unwrap();
        let points = reopened.recent(10).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, 5.5);
    }
}
