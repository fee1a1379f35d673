//! Transaction metadata supplied by the block-processing layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base-chain address identifying a feed.
///
/// Addresses are validated by the base chain before they reach this crate,
/// so this is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// Per-transaction metadata for a broadcast payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMeta {
    /// Global transaction index (arrival order)
    pub tx_index: u64,

    /// Transaction hash, hex encoded
    pub tx_hash: String,

    /// Height of the containing block
    pub block_index: u64,

    /// Source address (the publishing feed)
    pub source: Address,
}
