use std::{
    collections::{BTreeMap, HashMap, HashSet, hash_map::Entry},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::Storage;
use crate::{
    error::StorageError, oracle::LockOracle, processor::BroadcastAction,
    processor::BroadcastRecord, settlement::SettlementTrigger, transaction::Address,
};

/// In-memory storage for testing and tooling
///
/// Records are kept in arrival order. All state is wrapped in
/// `Arc<Mutex<>>` so clones share one ledger and can be read concurrently.
/// A poisoned mutex is recovered rather than propagated, since every
/// mutation leaves the state consistent.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Default)]
struct MemoryStorageInner {
    records: Vec<BroadcastRecord>,
    tx_indices: HashSet<u64>,
    feed_locks: HashMap<Address, u64>,
    settlements: BTreeMap<u64, SettlementTrigger>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn apply(&self, actions: &[BroadcastAction]) -> Result<(), StorageError> {
        let mut inner = self.lock();

        // Every fallible check runs before the first mutation
        let mut incoming = HashSet::new();
        for action in actions {
            let BroadcastAction::Persist(record) = action else { continue };
            if inner.tx_indices.contains(&record.tx_index) || !incoming.insert(record.tx_index) {
                return Err(StorageError::DuplicateRecord { tx_index: record.tx_index });
            }
        }

        for action in actions {
            match action {
                BroadcastAction::Persist(record) => {
                    inner.tx_indices.insert(record.tx_index);
                    inner.records.push(record.clone());
                },
                BroadcastAction::LockFeed { source, block_index } => {
                    match inner.feed_locks.entry(source.clone()) {
                        Entry::Occupied(_) => {
                            tracing::debug!(%source, block_index, "Feed already locked");
                        },
                        Entry::Vacant(slot) => {
                            slot.insert(*block_index);
                        },
                    }
                },
                BroadcastAction::Settle(trigger) => {
                    inner.settlements.insert(trigger.tx_index, trigger.clone());
                },
            }
        }

        Ok(())
    }

    fn load_feed(&self, source: &Address) -> Result<Vec<BroadcastRecord>, StorageError> {
        let mut feed: Vec<_> =
            self.lock().records.iter().filter(|r| &r.source == source).cloned().collect();
        feed.sort_by_key(|r| r.tx_index);
        Ok(feed)
    }

    fn lock_height(&self, source: &Address) -> Result<Option<u64>, StorageError> {
        Ok(self.lock().feed_locks.get(source).copied())
    }

    fn pending_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError> {
        Ok(self.lock().settlements.values().cloned().collect())
    }

    fn take_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError> {
        let taken = std::mem::take(&mut self.lock().settlements);
        Ok(taken.into_values().collect())
    }
}

impl LockOracle for MemoryStorage {
    fn is_locked(&self, source: &Address) -> bool {
        self.lock().feed_locks.contains_key(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validity::Validity;

    fn record(tx_index: u64, source: &str) -> BroadcastRecord {
        BroadcastRecord {
            tx_index,
            tx_hash: format!("hash{tx_index}"),
            block_index: 100,
            source: Address::new(source),
            message: None,
            validity: Validity::CouldNotUnpack,
        }
    }

    fn persist(tx_index: u64, source: &str) -> BroadcastAction {
        BroadcastAction::Persist(record(tx_index, source))
    }

    fn lock_feed(source: &str, block_index: u64) -> BroadcastAction {
        BroadcastAction::LockFeed { source: Address::new(source), block_index }
    }

    fn settle(tx_index: u64) -> BroadcastAction {
        BroadcastAction::Settle(SettlementTrigger {
            source: Address::new("a"),
            timestamp: 1,
            price_asset_id: 1,
            price_amount: 100,
            fee_multiplier: 0,
            block_index: 100,
            tx_index,
        })
    }

    #[test]
    fn duplicate_tx_index_is_rejected() {
        let storage = MemoryStorage::new();
        storage.apply(&[persist(1, "a")]).unwrap();

        let result = storage.apply(&[persist(1, "b")]);
        assert_eq!(result, Err(StorageError::DuplicateRecord { tx_index: 1 }));
        assert_eq!(storage.record_count(), 1);
    }

    #[test]
    fn failed_batch_leaves_no_trace() {
        let storage = MemoryStorage::new();
        let source = Address::new("a");

        // Lock step succeeds, a later step fails
        let result = storage.apply(&[persist(1, "a"), lock_feed("a", 10), settle(1), persist(1, "a")]);
        assert_eq!(result, Err(StorageError::DuplicateRecord { tx_index: 1 }));
        assert_eq!(storage.record_count(), 0);
        assert!(!storage.is_locked(&source));
        assert!(storage.pending_settlements().unwrap().is_empty());

        // Retrying the well-formed batch applies everything
        storage.apply(&[persist(1, "a"), lock_feed("a", 10), settle(1)]).unwrap();
        assert_eq!(storage.record_count(), 1);
        assert_eq!(storage.lock_height(&source).unwrap(), Some(10));
        assert_eq!(storage.pending_settlements().unwrap().len(), 1);
    }

    #[test]
    fn load_feed_filters_by_source() {
        let storage = MemoryStorage::new();
        storage.apply(&[persist(2, "a")]).unwrap();
        storage.apply(&[persist(1, "a")]).unwrap();
        storage.apply(&[persist(3, "b")]).unwrap();

        let feed = storage.load_feed(&Address::new("a")).unwrap();
        let indices: Vec<_> = feed.iter().map(|r| r.tx_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn lock_is_monotonic() {
        let storage = MemoryStorage::new();
        let source = Address::new("a");

        assert!(!storage.is_locked(&source));
        storage.apply(&[lock_feed("a", 10)]).unwrap();
        storage.apply(&[lock_feed("a", 20)]).unwrap();

        assert!(storage.is_locked(&source));
        assert_eq!(storage.lock_height(&source).unwrap(), Some(10));
    }

    #[test]
    fn taken_settlements_are_not_handed_out_again() {
        let storage = MemoryStorage::new();
        storage.apply(&[settle(2)]).unwrap();
        storage.apply(&[settle(1)]).unwrap();

        let taken: Vec<_> = storage.take_settlements().unwrap().iter().map(|t| t.tx_index).collect();
        assert_eq!(taken, vec![1, 2]);
        assert!(storage.take_settlements().unwrap().is_empty());
        assert!(storage.pending_settlements().unwrap().is_empty());

        storage.apply(&[settle(3)]).unwrap();
        assert_eq!(storage.take_settlements().unwrap().len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        clone.apply(&[persist(1, "a")]).unwrap();
        assert_eq!(storage.record_count(), 1);
    }
}
