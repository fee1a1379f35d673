//! Persistence for processed broadcasts.
//!
//! The [`Storage`] trait is the sink the host applies
//! [`BroadcastAction`](crate::BroadcastAction)s to. Two implementations are
//! provided: [`MemoryStorage`] for tests and tools, [`RedbStorage`] for a
//! durable on-disk index.
//!
//! # Invariants
//!
//! - One transaction's actions are applied atomically: the record, the feed
//!   lock and the settlement trigger are stored together or not at all.
//! - A record is stored at most once per `tx_index`.
//! - Feed locks are monotonic: the first lock height is kept, later locks
//!   are no-ops, and nothing unlocks a feed.
//! - A settlement trigger is handed out by [`Storage::take_settlements`]
//!   exactly once.

mod memory;
mod persistent;

pub use memory::MemoryStorage;
pub use persistent::RedbStorage;

use crate::{
    error::StorageError, processor::BroadcastAction, processor::BroadcastRecord,
    settlement::SettlementTrigger, transaction::Address,
};

/// Sink for processed broadcasts and the state they change.
pub trait Storage {
    /// Apply one transaction's actions as a single atomic write.
    ///
    /// If any action fails, none of them take effect, so the same actions
    /// can be retried. A `Persist` for an already stored `tx_index` fails
    /// the whole batch with [`StorageError::DuplicateRecord`].
    fn apply(&self, actions: &[BroadcastAction]) -> Result<(), StorageError>;

    /// All records published by `source`, in `tx_index` order
    fn load_feed(&self, source: &Address) -> Result<Vec<BroadcastRecord>, StorageError>;

    /// Height at which `source` was locked, if it is locked
    fn lock_height(&self, source: &Address) -> Result<Option<u64>, StorageError>;

    /// Queued settlement triggers in `tx_index` order, left in the queue
    fn pending_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError>;

    /// Remove and return the queued settlement triggers in `tx_index` order
    fn take_settlements(&self) -> Result<Vec<SettlementTrigger>, StorageError>;
}

/// Apply one transaction's processor actions to `storage`.
pub fn apply_actions(
    storage: &impl Storage,
    actions: impl IntoIterator<Item = BroadcastAction>,
) -> Result<(), StorageError> {
    let actions: Vec<_> = actions.into_iter().collect();
    storage.apply(&actions)
}
