//! Ledger directory: one live ledger instance per key
//!
//! Resolution is lazy and idempotent. Concurrent resolutions of the same
//! key land on the same `Arc<PriceLedger>`, so every append/recent for a
//! key is serialized by that key's own connection mutex — there is no
//! cross-key lock.

use super::store::{PriceLedger, StorageResult};
use crate::key::EntityKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

enum Backing {
    /// One database file per key under this directory.
    Disk(PathBuf),
    /// Per-key in-memory databases (useful for testing).
    Memory,
}

/// Registry mapping entity keys to their owning ledgers.
///
/// Guarantees at most one ledger instance exists per key: the vacant-entry
/// path below holds the key's map shard while opening, so a racing
/// resolver observes the finished entry instead of opening a second
/// instance. Ledgers are never deleted.
pub struct LedgerDirectory {
    backing: Backing,
    ledgers: DashMap<EntityKey, Arc<PriceLedger>>,
}

impl LedgerDirectory {
    /// Directory backed by one SQLite file per key under `data_dir`.
    ///
    /// The directory itself is created lazily, on the first resolve.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::Disk(data_dir.into()),
            ledgers: DashMap::new(),
        }
    }

    /// Directory backed by in-memory ledgers (useful for testing)
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory,
            ledgers: DashMap::new(),
        }
    }

    /// Resolve `key` to its ledger, creating an empty one on first use.
    ///
    /// Resolving an existing key returns a handle to the existing data
    /// and never reinitializes it.
    pub fn resolve(&self, key: &EntityKey) -> StorageResult<Arc<PriceLedger>> {
        if let Some(ledger) = self.ledgers.get(key) {
            return Ok(Arc::clone(&ledger));
        }

        match self.ledgers.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let ledger = Arc::new(self.open_ledger(key)?);
                debug!(key = %key, "opened ledger");
                entry.insert(Arc::clone(&ledger));
                Ok(ledger)
            }
        }
    }

    fn open_ledger(&self, key: &EntityKey) -> StorageResult<PriceLedger> {
        match &self.backing {
            Backing::Disk(dir) => {
                let path = dir.join(format!("{}.db", key.file_stem()));
                PriceLedger::open(key.clone(), path)
            }
            Backing::Memory => PriceLedger::open_in_memory(key.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PricePoint;

    #[test]
    fn resolving_twice_yields_the_same_instance() {
        let directory = LedgerDirectory::in_memory();
        let key = EntityKey::normalize("dracula").unwrap();

        let first = directory.resolve(&key).unwrap();
        let second = directory.resolve(&key).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn append_through_one_handle_is_visible_through_the_other() {
        let directory = LedgerDirectory::in_memory();
        let key = EntityKey::normalize("dracula").unwrap();

        let writer = directory.resolve(&key).unwrap();
        let reader = directory.resolve(&key).unwrap();

        writer.append(&PricePoint::new(19.99, 42)).unwrap();

        let points = reader.recent(10).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, 19.99);
    }

    #[test]
    fn keys_are_isolated_from_each_other() {
        let directory = LedgerDirectory::in_memory();
        let dracula = EntityKey::normalize("dracula").unwrap();
        let attic = EntityKey::normalize("a light in the attic").unwrap();

        directory
            .resolve(&dracula)
            .unwrap()
            .append(&PricePoint::new(19.99, 1))
            .unwrap();

        let other = directory.resolve(&attic).unwrap();
        assert!(other.recent(10).unwrap().is_empty());
    }

    #[test]
    fn disk_backing_creates_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let directory = LedgerDirectory::new(dir.path());
        let key = EntityKey::normalize("light in the attic").unwrap();

        directory
            .resolve(&key)
            .unwrap()
            .append(&PricePoint::new(51.77, 1))
            .unwrap();

        assert!(dir.path().join("light%20in%20the%20attic.db").exists());
    }

    #[test]
    fn reresolving_on_disk_does_not_reinitialize() {
        let dir = tempfile::tempdir().unwrap();
        let key = EntityKey::normalize("item").unwrap();

        {
            let directory = LedgerDirectory::new(dir.path());
            let ledger = directory.resolve(&key).unwrap();
            ledger.append(&PricePoint::new(1.0, 1)).unwrap();
        }

        // A fresh directory over the same data dir sees the old points.
        let directory = LedgerDirectory::new(dir.path());
        let ledger = directory.resolve(&key).unwrap();
        assert_eq!(ledger.recent(10).unwrap().len(), 1);
    }
}
