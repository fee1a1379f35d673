//! Fixed-width broadcast header with zero-copy parsing.
//!
//! The header is the first 25 bytes of a broadcast body. It is stored as
//! raw big-endian byte arrays so it can be cast from any buffer without
//! alignment concerns.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::UnpackError;

/// Fixed 25-byte broadcast header (Big Endian network byte order)
///
/// The final byte is the length of the UTF-8 text that follows the header.
/// Every 25-byte pattern is a valid header; semantic checks on the text
/// happen in [`crate::BroadcastMessage::unpack`].
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct BroadcastHeader {
    timestamp: [u8; 4],      // u32 seconds since epoch
    price_asset_id: [u8; 8], // u64 asset the price is quoted in
    price_amount: [u8; 8],   // u64 price in the asset's smallest unit
    fee_multiplier: [u8; 4], // u32 fee rate scaled by 10^8
    text_len: u8,
}

impl BroadcastHeader {
    /// Size of the serialized header
    pub const SIZE: usize = 25;

    /// Build a header from field values
    #[must_use]
    pub fn new(
        timestamp: u32,
        price_asset_id: u64,
        price_amount: u64,
        fee_multiplier: u32,
        text_len: u8,
    ) -> Self {
        Self {
            timestamp: timestamp.to_be_bytes(),
            price_asset_id: price_asset_id.to_be_bytes(),
            price_amount: price_amount.to_be_bytes(),
            fee_multiplier: fee_multiplier.to_be_bytes(),
            text_len,
        }
    }

    /// Parse the header from the front of a body (zero-copy).
    ///
    /// Returns the header and the bytes that follow it.
    pub fn from_prefix(bytes: &[u8]) -> Result<(&Self, &[u8]), UnpackError> {
        Self::ref_from_prefix(bytes)
            .map_err(|_| UnpackError::BodyTooShort { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Serialize header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    /// Get the timestamp
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes(self.timestamp)
    }

    /// Get the price asset id
    #[must_use]
    pub fn price_asset_id(&self) -> u64 {
        u64::from_be_bytes(self.price_asset_id)
    }

    /// Get the price amount
    #[must_use]
    pub fn price_amount(&self) -> u64 {
        u64::from_be_bytes(self.price_amount)
    }

    /// Get the fee multiplier
    #[must_use]
    pub fn fee_multiplier(&self) -> u32 {
        u32::from_be_bytes(self.fee_multiplier)
    }

    /// Get the declared text length
    #[must_use]
    pub fn text_len(&self) -> usize {
        usize::from(self.text_len)
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for BroadcastHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHeader")
            .field("timestamp", &self.timestamp())
            .field("price_asset_id", &self.price_asset_id())
            .field("price_amount", &self.price_amount())
            .field("fee_multiplier", &self.fee_multiplier())
            .field("text_len", &self.text_len())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for BroadcastHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BroadcastHeader {}
