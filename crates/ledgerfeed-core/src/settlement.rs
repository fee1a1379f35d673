//! Settlement extension point.
//!
//! Wagers and contracts that reference a feed resolve against its priced
//! broadcasts. Resolution belongs to an external settlement engine; this
//! crate only emits a [`SettlementTrigger`] for each valid priced broadcast,
//! in transaction order.

use serde::{Deserialize, Serialize};

use crate::transaction::Address;

/// A valid priced broadcast, handed to the settlement engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTrigger {
    /// Feed that published the price
    pub source: Address,

    /// Broadcast timestamp (the wager resolution key)
    pub timestamp: u32,

    /// Asset the price is denominated in
    pub price_asset_id: u64,

    /// Raw price amount
    pub price_amount: u64,

    /// Fee multiplier in effect for the feed
    pub fee_multiplier: u32,

    /// Block that carried the broadcast
    pub block_index: u64,

    /// Transaction that carried the broadcast
    pub tx_index: u64,
}

impl SettlementTrigger {
    /// Key the settlement engine matches contracts on
    pub fn key(&self) -> (&Address, u32, u64) {
        (&self.source, self.timestamp, self.price_asset_id)
    }
}
