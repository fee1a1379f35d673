//! Price display for valid broadcasts.
//!
//! Divisible assets store amounts in subunits; their display value is the
//! raw amount divided by the protocol unit. The division is done with
//! integers so displayed prices are exact.

use std::fmt;

use chrono::{DateTime, SecondsFormat};
use ledgerfeed_proto::BroadcastMessage;
use serde::Serialize;

use crate::{oracle::AssetRegistry, processor::BroadcastRecord};

/// Amount as it should be displayed.
///
/// Built only from a validated unit, so the decimal point always sits where
/// the asset's unit puts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayAmount {
    raw: u64,
    decimals: u32,
}

impl DisplayAmount {
    /// Whole units of an indivisible asset
    pub(crate) fn whole(raw: u64) -> Self {
        Self { raw, decimals: 0 }
    }

    /// Subunits of a divisible asset, `decimals` fractional digits
    pub(crate) fn scaled(raw: u64, decimals: u32) -> Self {
        Self { raw, decimals }
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { raw, decimals } = *self;
        if decimals == 0 {
            return write!(f, "{raw}");
        }

        let width = decimals as usize;
        match 10u64.checked_pow(decimals) {
            Some(unit) => write!(f, "{}.{:0width$}", raw / unit, raw % unit),
            // every u64 is below 10^20
            None => write!(f, "0.{raw:0width$}"),
        }
    }
}

/// A price quoted by a valid broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    /// Asset the price is denominated in
    pub asset_id: u64,

    /// Display name from the asset registry
    pub asset_name: String,

    /// Quoted amount
    pub amount: DisplayAmount,
}

impl PriceQuote {
    /// Build the quote carried by `message`, with divisible amounts shown
    /// to `decimals` fractional digits.
    ///
    /// Returns `None` when the price amount is zero: such a broadcast carries
    /// no price, not a price of zero.
    pub(crate) fn from_message(
        message: &BroadcastMessage,
        registry: &impl AssetRegistry,
        decimals: u32,
    ) -> Option<Self> {
        if !message.has_price() {
            return None;
        }

        let asset_id = message.price_asset_id;
        let amount = if registry.is_divisible(asset_id) {
            DisplayAmount::scaled(message.price_amount, decimals)
        } else {
            DisplayAmount::whole(message.price_amount)
        };

        Some(Self { asset_id, asset_name: registry.asset_name(asset_id), amount })
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.asset_name)
    }
}

/// One-line human summary of a broadcast.
///
/// `'text' from SOURCE at TIME (HASH)`, or `'text = PRICE ASSET' ...` when
/// a quote is given. Returns `None` for records without fields.
pub fn summary(record: &BroadcastRecord, quote: Option<&PriceQuote>) -> Option<String> {
    let message = record.message.as_ref()?;

    let at = DateTime::from_timestamp(i64::from(message.timestamp), 0).map_or_else(
        || message.timestamp.to_string(),
        |time| time.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    let suffix = format!("from {} at {} ({})", record.source, at, record.tx_hash);

    Some(match quote {
        Some(quote) => format!("'{} = {}' {}", message.text, quote, suffix),
        None => format!("'{}' {}", message.text, suffix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{oracle::StaticAssetRegistry, transaction::Address, validity::Validity};

    fn registry() -> StaticAssetRegistry {
        StaticAssetRegistry::new().with_asset(1, "XCP", true).with_asset(9, "TICKET", false)
    }

    #[test]
    fn divisible_amount_is_scaled() {
        assert_eq!(DisplayAmount::scaled(150_000_000, 8).to_string(), "1.50000000");
        assert_eq!(DisplayAmount::scaled(1, 8).to_string(), "0.00000001");
        assert_eq!(DisplayAmount::scaled(1_234, 3).to_string(), "1.234");
    }

    #[test]
    fn decimals_beyond_u64_range_stay_exact() {
        assert_eq!(DisplayAmount::scaled(42, 20).to_string(), "0.00000000000000000042");
    }

    #[test]
    fn indivisible_amount_is_raw() {
        assert_eq!(DisplayAmount::whole(3).to_string(), "3");
        assert_eq!(DisplayAmount::scaled(3, 0).to_string(), "3");
    }

    #[test]
    fn zero_price_has_no_quote() {
        let message = BroadcastMessage::new(0, 1, 0, 0, "no price");
        assert_eq!(PriceQuote::from_message(&message, &registry(), 8), None);
    }

    #[test]
    fn quote_uses_registry() {
        let message = BroadcastMessage::new(0, 9, 2, 0, "outcome");
        let quote = PriceQuote::from_message(&message, &registry(), 8).unwrap();

        assert_eq!(quote.amount, DisplayAmount::whole(2));
        assert_eq!(quote.to_string(), "2 TICKET");
    }

    #[test]
    fn summary_formats() {
        let record = BroadcastRecord {
            tx_index: 1,
            tx_hash: "abcd".to_string(),
            block_index: 10,
            source: Address::new("1Feed"),
            message: Some(BroadcastMessage::new(1_000_000_000, 1, 250_000_000, 0, "BTC")),
            validity: Validity::Valid,
        };

        assert_eq!(
            summary(&record, None).unwrap(),
            "'BTC' from 1Feed at 2001-09-09T01:46:40Z (abcd)"
        );

        let message = record.message.as_ref().unwrap();
        let quote = PriceQuote::from_message(message, &registry(), 8).unwrap();
        assert_eq!(
            summary(&record, Some(&quote)).unwrap(),
            "'BTC = 2.50000000 XCP' from 1Feed at 2001-09-09T01:46:40Z (abcd)"
        );
    }
}
