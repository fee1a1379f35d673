use std::{fmt::Display, path::Path};

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Serialize, de::DeserializeOwned};

use super::Storage;
use crate::{
    error::StorageError, oracle::LockOracle, processor::BroadcastAction,
    processor::BroadcastRecord, settlement::SettlementTrigger, transaction::Address,
};

/// Records keyed by `tx_index`, CBOR-encoded
const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("broadcasts");

/// Lock height keyed by feed address
const FEED_LOCKS: TableDefinition<&str, u64> = TableDefinition::new("feed_locks");

/// Pending settlement triggers keyed by `tx_index`, CBOR-encoded
const SETTLEMENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("pending_settlements");

/// Durable storage backed by redb
///
/// Each [`Storage::apply`] call is one redb write transaction, committed
/// only when every action succeeded. Tables are created when the database
/// is opened.
pub struct RedbStorage {
    db: Database,
}

fn backend(err: impl Display) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    ciborium::de::from_reader(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl RedbStorage {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(backend)?;

        let txn = db.begin_write().map_err(backend)?;
        {
            txn.open_table(RECORDS).map_err(backend)?;
            txn.open_table(FEED_LOCKS).map_err(backend)?;
            txn.open_table(SETTLEMENTS).map_err(backend)?;
        }
        txn.commit().map_err(backend)?;

        Ok(Self { db })
    }

    /// Run `body` in one write transaction, aborting it on error
    fn write<T>(
        &self,
        body: impl FnOnce(&WriteTransaction) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let txn = self.db.begin_write().map_err(backend)?;
        match body(&txn) {
            Ok(value) => {
                txn.commit().map_err(backend)?;
                Ok(value)
            },
            Err(error) => {
                txn.abort().map_err(backend)?;
                Err(error)
            },
        }
    }

    fn read_settlements(
        table: &impl ReadableTable<u64, &'static [u8]>,
    ) -> Result<Vec<(u64, SettlementTrigger)>, StorageError> {
        let mut triggers = Vec::new();
        for entry in table.iter().map_err(backend)? {
            let (key, value) = entry.map_err(backend)?;
            triggers.push((key.value(), from_cbor(value.value())?));
        }
        Ok(triggers)
    }
}

fn write_actions(txn: &WriteTransaction, actions: &[BroadcastAction]) -> Result<(), StorageError> {
    let mut records = txn.open_table(RECORDS).map_err(backend)?;
    let mut locks = txn.open_table(FEED_LOCKS).map_err(backend)?;
    let mut settlements = txn.open_table(SETTLEMENTS).map_err(backend)?;

    for action in actions {
        match action {
            BroadcastAction::Persist(record) => {
                let exists = records.get(record.tx_index).map_err(backend)?.is_some();
                if exists {
                    return Err(StorageError::DuplicateRecord { tx_index: record.tx_index });
                }
                let bytes = to_cbor(record)?;
                records.insert(record.tx_index, bytes.as_slice()).map_err(backend)?;
                tracing::trace!(tx_index = record.tx_index, "Stored broadcast record");
            },
            BroadcastAction::LockFeed { source, block_index } => {
                let locked = locks.get(source.as_str()).map_err(backend)?.is_some();
                if locked {
                    tracing::debug!(%source, block_index, "Feed already locked");
                } else {
                    locks.insert(source.as_str(), *block_index).map_err(backend)?;
                }
            },
            BroadcastAction::Settle(trigger) => {
                let bytes = to_cbor(trigger)?;
                settlements.insert(trigger.tx_index, bytes.as_slice()).map_err(backend)?;
            },
        }
    }

    Ok(())
}

impl Storage for RedbStorage {
    fn apply(&self, actions: &[BroadcastAction]) -> Result<(), StorageError> {
        self.write(|txn| write_actions(txn, actions))
    }

    fn load_feed(&self, source: &Address) -> Result<Vec<BroadcastRecord>, StorageError> {
        let txn = self.db.begin_read().map_err(backend)?;
        let table = txn.open_table(RECORDS).map_err(backend)?;

        let mut feed = Vec::new();
        for entry in table.iter().map_err(backend)? {
            let (_, value) = entry.map_err(backend)?;
            let record: BroadcastRecord = from_cbor(value.value())?;
            if &record.source == source {
                feed.push(record);
            }
        }

        Ok(feed)
    }

    fn lock_height(&self, source: &Address) -> Result<Option<u64>, StorageError> {
        let txn = self.db.begin_read().map_err(backend)?;
        let table = txn.open_table(FEED_LOCKS).map_err(backend)?;
        let height = table.get(source.as_str()).map_err(backend)?.map(|guard| guard.value());
        Ok(height)
    }

    fn pending_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError> {
        let txn = self.db.begin_read().map_err(backend)?;
        let table = txn.open_table(SETTLEMENTS).map_err(backend)?;
        let pending = Self::read_settlements(&table)?;
        Ok(pending.into_iter().map(|(_, trigger)| trigger).collect())
    }

    fn take_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError> {
        self.write(|txn| {
            let mut table = txn.open_table(SETTLEMENTS).map_err(backend)?;
            let taken = Self::read_settlements(&table)?;
            for (key, _) in &taken {
                table.remove(*key).map_err(backend)?;
            }
            Ok(taken.into_iter().map(|(_, trigger)| trigger).collect())
        })
    }
}

/// Storage failures are treated as locked: a feed is never accepted on a
/// lookup that could not be completed.
impl LockOracle for RedbStorage {
    fn is_locked(&self, source: &Address) -> bool {
        match self.lock_height(source) {
            Ok(height) => height.is_some(),
            Err(error) => {
                tracing::error!(%source, %error, "Feed lock lookup failed");
                true
            },
        }
    }
}
