//! Broadcast decoder and validator.
//!
//! Decoding is two-stage. The body is unpacked into a [`Result`]; only on
//! success is the lock oracle consulted. Nothing here returns an error for
//! bad input, every payload yields a [`DecodedBroadcast`].

use ledgerfeed_proto::{BroadcastMessage, Envelope, MessageType};

use crate::{oracle::LockOracle, transaction::Address, validity::Validity};

/// Decoder output: the unpacked fields (if any) and their validity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBroadcast {
    /// Unpacked fields, `None` when the payload could not be unpacked
    pub message: Option<BroadcastMessage>,

    /// Validity classification
    pub validity: Validity,
}

impl DecodedBroadcast {
    fn could_not_unpack() -> Self {
        Self { message: None, validity: Validity::CouldNotUnpack }
    }
}

/// Decode a broadcast body (the bytes after the envelope).
///
/// Rules, first match wins:
/// 1. Body does not unpack: [`Validity::CouldNotUnpack`], no fields, the
///    oracle is not called.
/// 2. `source` is locked: [`Validity::AddressLocked`], fields reported.
/// 3. Otherwise [`Validity::Valid`].
pub fn decode(body: &[u8], source: &Address, locks: &impl LockOracle) -> DecodedBroadcast {
    let message = match BroadcastMessage::unpack(body) {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(%source, %error, "Could not unpack broadcast");
            return DecodedBroadcast::could_not_unpack();
        },
    };

    let validity =
        if locks.is_locked(source) { Validity::AddressLocked } else { Validity::Valid };

    DecodedBroadcast { message: Some(message), validity }
}

/// Decode a full payload (envelope + body).
///
/// A missing or foreign envelope is a structural failure and classified as
/// [`Validity::CouldNotUnpack`].
pub fn decode_payload(payload: &[u8], source: &Address, locks: &impl LockOracle) -> DecodedBroadcast {
    match Envelope::split(payload) {
        Ok((MessageType::Broadcast, body)) => decode(body, source, locks),
        Err(error) => {
            tracing::warn!(%source, %error, "Broadcast payload has no valid envelope");
            DecodedBroadcast::could_not_unpack()
        },
    }
}
