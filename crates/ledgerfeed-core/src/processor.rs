//! Per-transaction broadcast processing.
//!
//! [`BroadcastProcessor::process`] decodes one transaction's broadcast and
//! returns the actions the host must apply. It never mutates state itself:
//! persisting the record, locking the feed and queueing settlement are all
//! expressed as [`BroadcastAction`]s.
//!
//! # Invariants
//!
//! - Every call yields exactly one [`BroadcastAction::Persist`], whatever the
//!   validity, so the stored history is a complete audit trail.
//! - `LockFeed` and `Settle` are only emitted for [`Validity::Valid`]
//!   records.

use ledgerfeed_proto::BroadcastMessage;
use serde::{Deserialize, Serialize};

use crate::{
    config::ProcessorConfig,
    decoder::{self, DecodedBroadcast},
    error::ConfigError,
    oracle::{AssetRegistry, LockOracle},
    quote::{self, PriceQuote},
    settlement::SettlementTrigger,
    transaction::{Address, TransactionMeta},
    validity::Validity,
};

/// One persisted row per processed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRecord {
    /// Transaction index
    pub tx_index: u64,

    /// Transaction hash
    pub tx_hash: String,

    /// Block height
    pub block_index: u64,

    /// Publishing feed
    pub source: Address,

    /// Unpacked fields, `None` if the payload could not be unpacked
    pub message: Option<BroadcastMessage>,

    /// Validity classification
    pub validity: Validity,
}

impl BroadcastRecord {
    /// Combine transaction metadata with a decoder result
    pub fn new(tx: &TransactionMeta, decoded: DecodedBroadcast) -> Self {
        Self {
            tx_index: tx.tx_index,
            tx_hash: tx.tx_hash.clone(),
            block_index: tx.block_index,
            source: tx.source.clone(),
            message: decoded.message,
            validity: decoded.validity,
        }
    }

    /// Timestamp column
    pub fn timestamp(&self) -> Option<u32> {
        self.message.as_ref().map(|m| m.timestamp)
    }

    /// Price asset column
    pub fn price_asset_id(&self) -> Option<u64> {
        self.message.as_ref().map(|m| m.price_asset_id)
    }

    /// Price amount column
    pub fn price_amount(&self) -> Option<u64> {
        self.message.as_ref().map(|m| m.price_amount)
    }

    /// Fee multiplier column
    pub fn fee_multiplier(&self) -> Option<u32> {
        self.message.as_ref().map(|m| m.fee_multiplier)
    }

    /// Text column
    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// Fields of a valid record, `None` otherwise
    pub fn valid_message(&self) -> Option<&BroadcastMessage> {
        if self.validity.is_valid() { self.message.as_ref() } else { None }
    }
}

/// Effects requested by the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastAction {
    /// Store the record (always emitted, valid or not)
    Persist(BroadcastRecord),

    /// Lock the feed from this block onward
    LockFeed {
        /// Feed to lock
        source: Address,
        /// Height of the locking broadcast
        block_index: u64,
    },

    /// Hand a priced broadcast to the settlement engine
    Settle(SettlementTrigger),
}

/// Stateless broadcast processor
#[derive(Debug, Clone)]
pub struct BroadcastProcessor<R> {
    config: ProcessorConfig,
    assets: R,
}

impl<R: AssetRegistry> BroadcastProcessor<R> {
    /// Create a processor, rejecting invalid configuration
    pub fn new(config: ProcessorConfig, assets: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, assets })
    }

    /// Process a broadcast body (the bytes after the envelope).
    pub fn process(
        &self,
        tx: &TransactionMeta,
        body: &[u8],
        locks: &impl LockOracle,
    ) -> Vec<BroadcastAction> {
        let decoded = decoder::decode(body, &tx.source, locks);
        self.actions_for(BroadcastRecord::new(tx, decoded))
    }

    /// Process a full payload (envelope + body).
    pub fn process_payload(
        &self,
        tx: &TransactionMeta,
        payload: &[u8],
        locks: &impl LockOracle,
    ) -> Vec<BroadcastAction> {
        let decoded = decoder::decode_payload(payload, &tx.source, locks);
        self.actions_for(BroadcastRecord::new(tx, decoded))
    }

    /// Price quoted by a valid record, `None` if invalid or unpriced
    pub fn quote(&self, record: &BroadcastRecord) -> Option<PriceQuote> {
        let message = record.valid_message()?;
        PriceQuote::from_message(message, &self.assets, self.config.unit_decimals())
    }

    /// Human summary of a valid record
    pub fn summarize(&self, record: &BroadcastRecord) -> Option<String> {
        record.valid_message()?;
        quote::summary(record, self.quote(record).as_ref())
    }

    fn actions_for(&self, record: BroadcastRecord) -> Vec<BroadcastAction> {
        tracing::debug!(
            tx_index = record.tx_index,
            block_index = record.block_index,
            source = %record.source,
            validity = %record.validity,
            "Decoded broadcast"
        );

        let mut actions = Vec::with_capacity(2);

        if let Some(message) = record.valid_message() {
            if let Some(line) = self.summarize(&record) {
                tracing::info!(tx_index = record.tx_index, "Broadcast: {line}");
            }

            if message.has_price() {
                actions.push(BroadcastAction::Settle(SettlementTrigger {
                    source: record.source.clone(),
                    timestamp: message.timestamp,
                    price_asset_id: message.price_asset_id,
                    price_amount: message.price_amount,
                    fee_multiplier: message.fee_multiplier,
                    block_index: record.block_index,
                    tx_index: record.tx_index,
                }));
            }

            if message.is_lock_directive() {
                tracing::info!(
                    source = %record.source,
                    block_index = record.block_index,
                    "Feed locked by empty broadcast"
                );
                actions.push(BroadcastAction::LockFeed {
                    source: record.source.clone(),
                    block_index: record.block_index,
                });
            }
        }

        actions.insert(0, BroadcastAction::Persist(record));
        actions
    }
}
