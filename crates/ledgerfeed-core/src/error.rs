//! Error types for the broadcast core.
//!
//! Malformed broadcasts are not errors here: they become a
//! [`crate::Validity`] tag. These types cover the caller-facing failures
//! that remain: storage backends and configuration.

use thiserror::Error;

/// Errors from a [`crate::storage::Storage`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A record for this transaction was already stored
    #[error("duplicate record for tx_index {tx_index}")]
    DuplicateRecord {
        /// Transaction index of the rejected record
        tx_index: u64,
    },

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying storage backend failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Rejected [`crate::ProcessorConfig`] values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Divisible-asset unit must be non-zero
    #[error("unit must be non-zero")]
    ZeroUnit,

    /// Divisible-asset unit must be a power of ten
    #[error("unit must be a power of ten, got {0}")]
    UnitNotPowerOfTen(u64),
}
