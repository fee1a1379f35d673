//! Outbound broadcast construction.
//!
//! The transaction builder (fees, dust outputs, signing) lives outside this
//! crate. It receives a [`ComposedBroadcast`]: the source to spend from and
//! the opaque payload to embed.

use ledgerfeed_proto::{BroadcastMessage, EncodingError};

use crate::transaction::Address;

/// Payload ready to be embedded in a transaction from `source`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedBroadcast {
    /// Address the transaction must be sent from
    pub source: Address,

    /// Envelope + body bytes
    pub data: Vec<u8>,
}

/// Build the payload for a new broadcast from `source`.
///
/// Lock state is not consulted: broadcasting to a locked feed produces a
/// payload that decoders will classify as locked.
pub fn compose(
    source: Address,
    timestamp: u32,
    price_asset_id: u64,
    price_amount: u64,
    fee_multiplier: u32,
    text: &str,
) -> Result<ComposedBroadcast, EncodingError> {
    let message =
        BroadcastMessage::new(timestamp, price_asset_id, price_amount, fee_multiplier, text);
    let data = message.to_bytes()?;

    tracing::debug!(%source, len = data.len(), "Composed broadcast");

    Ok(ComposedBroadcast { source, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_keeps_source_out_of_payload() {
        let composed = compose(Address::new("1Feed"), 1, 0, 0, 0, "hello").unwrap();
        assert_eq!(composed.source, Address::new("1Feed"));
        assert_eq!(composed.data.len(), 33 + 5);
        assert!(!composed.data.windows(5).any(|w| w == b"1Feed"));
    }

    #[test]
    fn compose_rejects_long_text() {
        let result = compose(Address::new("1Feed"), 1, 0, 0, 0, &"x".repeat(256));
        assert_eq!(result, Err(EncodingError::TextTooLong { len: 256, max: 255 }));
    }
}
