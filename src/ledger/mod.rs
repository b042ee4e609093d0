//! Per-item price ledgers
//!
//! Each tracked item owns an append-only, time-ordered sequence of price
//! observations in its own SQLite database. The directory guarantees one
//! live ledger instance per key; the ledger serializes every read and
//! write against that key.

mod directory;
mod point;
mod store;

pub use directory::LedgerDirectory;
pub use point::PricePoint;
pub use store::{PriceLedger, StorageError, StorageResult};
