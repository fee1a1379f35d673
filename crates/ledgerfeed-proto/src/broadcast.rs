//! Broadcast message body.
//!
//! A broadcast publishes a timestamped fact from a feed. It may quote a
//! price in some asset; a zero `price_amount` means no price. An empty text
//! is the directive that locks the publishing feed.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::{
    BroadcastHeader, Envelope, MessageType,
    errors::{EncodingError, UnpackError},
};

/// Fixed-point scale of `fee_multiplier` (`100_000_000` = 100%)
///
/// The field is a `u32`, so the largest expressible multiplier is about
/// 42.9. No tighter bound is enforced.
pub const FEE_MULTIPLIER_SCALE: u32 = 100_000_000;

/// Decoded broadcast body
///
/// # Invariants
///
/// - `text.len() <= MAX_TEXT_LEN` for any value produced by [`Self::unpack`].
///   Values built by hand may violate this; [`Self::encode`] rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastMessage {
    /// Seconds since epoch; the feed's ordering key
    pub timestamp: u32,

    /// Asset the price is denominated in
    pub price_asset_id: u64,

    /// Price in the asset's smallest unit, zero for no price
    pub price_amount: u64,

    /// Fee rate scaled by [`FEE_MULTIPLIER_SCALE`]
    pub fee_multiplier: u32,

    /// Broadcast text; empty locks the feed
    pub text: String,
}

impl BroadcastMessage {
    /// Message type id this body is carried under
    pub const MESSAGE_TYPE: MessageType = MessageType::Broadcast;

    /// Longest text the one-byte length prefix can describe
    pub const MAX_TEXT_LEN: usize = u8::MAX as usize;

    /// Create a message from its fields
    pub fn new(
        timestamp: u32,
        price_asset_id: u64,
        price_amount: u64,
        fee_multiplier: u32,
        text: impl Into<String>,
    ) -> Self {
        Self { timestamp, price_asset_id, price_amount, fee_multiplier, text: text.into() }
    }

    /// True if this message quotes a price
    pub fn has_price(&self) -> bool {
        self.price_amount != 0
    }

    /// True if this message is a feed-lock directive (empty text)
    pub fn is_lock_directive(&self) -> bool {
        self.text.is_empty()
    }

    /// Fee multiplier as a ratio (`1.0` = 100%)
    pub fn fee_multiplier_ratio(&self) -> f64 {
        f64::from(self.fee_multiplier) / f64::from(FEE_MULTIPLIER_SCALE)
    }

    /// Length of the body on the wire (without envelope)
    pub fn body_len(&self) -> usize {
        BroadcastHeader::SIZE + self.text.len()
    }

    /// Encode envelope and body into `dst`.
    ///
    /// Nothing is written when the text is too long.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<(), EncodingError> {
        let header = self.header()?;

        dst.put_slice(&Envelope::new(Self::MESSAGE_TYPE).to_bytes());
        dst.put_slice(&header.to_bytes());
        dst.put_slice(self.text.as_bytes());

        Ok(())
    }

    /// Encode only the body (header + text) into `dst`
    pub fn encode_body(&self, dst: &mut impl BufMut) -> Result<(), EncodingError> {
        let header = self.header()?;

        dst.put_slice(&header.to_bytes());
        dst.put_slice(self.text.as_bytes());

        Ok(())
    }

    /// Encode envelope and body into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::with_capacity(Envelope::SIZE + self.body_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Unpack a body (the bytes after the envelope).
    ///
    /// The body must be exactly the header plus the declared text length,
    /// and the text must be UTF-8.
    pub fn unpack(body: &[u8]) -> Result<Self, UnpackError> {
        let (header, rest) = BroadcastHeader::from_prefix(body)?;

        let text_len = header.text_len();
        if rest.len() < text_len {
            return Err(UnpackError::TextTruncated { expected: text_len, actual: rest.len() });
        }
        if rest.len() > text_len {
            return Err(UnpackError::TrailingBytes { extra: rest.len() - text_len });
        }

        let text = std::str::from_utf8(rest)
            .map_err(|e| UnpackError::InvalidUtf8 { valid_up_to: e.valid_up_to() })?;

        Ok(Self {
            timestamp: header.timestamp(),
            price_asset_id: header.price_asset_id(),
            price_amount: header.price_amount(),
            fee_multiplier: header.fee_multiplier(),
            text: text.to_owned(),
        })
    }

    fn header(&self) -> Result<BroadcastHeader, EncodingError> {
        let text_len = u8::try_from(self.text.len()).map_err(|_| EncodingError::TextTooLong {
            len: self.text.len(),
            max: Self::MAX_TEXT_LEN,
        })?;

        Ok(BroadcastHeader::new(
            self.timestamp,
            self.price_asset_id,
            self.price_amount,
            self.fee_multiplier,
            text_len,
        ))
    }
}

/// Build the full payload (envelope + body) for a new broadcast
pub fn encode(
    timestamp: u32,
    price_asset_id: u64,
    price_amount: u64,
    fee_multiplier: u32,
    text: &str,
) -> Result<Vec<u8>, EncodingError> {
    BroadcastMessage::new(timestamp, price_asset_id, price_amount, fee_multiplier, text).to_bytes()
}
