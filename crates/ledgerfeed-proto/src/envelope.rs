//! Payload envelope: protocol prefix and message type id.
//!
//! Every overlay payload starts with the same 4-byte prefix followed by a
//! big-endian `u32` message type id. Block processing reads only these 8
//! bytes to decide which message decoder receives the body.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::EnvelopeError;

/// Message type ids carried in the envelope.
///
/// Unknown ids map to `None` in [`MessageType::from_u32`] rather than a
/// catch-all variant, so callers must decide what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageType {
    /// Timestamped fact from a feed, optionally priced
    Broadcast = 30,
}

impl MessageType {
    /// Wire value of this message type
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    /// Parse a wire value, `None` if unknown
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            30 => Some(Self::Broadcast),
            _ => None,
        }
    }
}

/// Fixed 8-byte payload envelope (Big Endian)
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct Envelope {
    prefix: [u8; 4],
    message_type: [u8; 4],
}

impl Envelope {
    /// Size of the serialized envelope
    pub const SIZE: usize = 8;

    /// Protocol prefix shared by every overlay payload
    pub const PREFIX: [u8; 4] = *b"LDGR";

    /// Create an envelope for the given message type
    #[must_use]
    pub fn new(message_type: MessageType) -> Self {
        Self { prefix: Self::PREFIX, message_type: message_type.to_u32().to_be_bytes() }
    }

    /// Split a full payload into its message type and body.
    ///
    /// Checks, in order: length, prefix, known message type. The body is
    /// returned as a borrowed slice and is not inspected.
    pub fn split(payload: &[u8]) -> Result<(MessageType, &[u8]), EnvelopeError> {
        let (envelope, body) = Self::ref_from_prefix(payload).map_err(|_| {
            EnvelopeError::TooShort { expected: Self::SIZE, actual: payload.len() }
        })?;

        if envelope.prefix != Self::PREFIX {
            return Err(EnvelopeError::InvalidPrefix(envelope.prefix));
        }

        let raw = envelope.message_type_id();
        let message_type =
            MessageType::from_u32(raw).ok_or(EnvelopeError::UnknownMessageType(raw))?;

        Ok((message_type, body))
    }

    /// Raw message type id
    #[must_use]
    pub fn message_type_id(&self) -> u32 {
        u32::from_be_bytes(self.message_type)
    }

    /// Serialize envelope to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("prefix", &self.prefix)
            .field("message_type", &self.message_type_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn envelope_size() {
        assert_eq!(std::mem::size_of::<Envelope>(), Envelope::SIZE);
    }

    #[test]
    fn broadcast_envelope_bytes() {
        let envelope = Envelope::new(MessageType::Broadcast);
        assert_eq!(envelope.to_bytes(), hex!("4c444752 0000001e"));
    }

    #[test]
    fn split_returns_body() {
        let payload = hex!("4c444752 0000001e aabbcc");
        let (message_type, body) = Envelope::split(&payload).unwrap();
        assert_eq!(message_type, MessageType::Broadcast);
        assert_eq!(body, &hex!("aabbcc"));
    }

    #[test]
    fn reject_short_payload() {
        let result = Envelope::split(&[0x4c, 0x44, 0x47]);
        assert_eq!(result, Err(EnvelopeError::TooShort { expected: 8, actual: 3 }));
    }

    #[test]
    fn reject_wrong_prefix() {
        let payload = hex!("deadbeef 0000001e");
        let result = Envelope::split(&payload);
        assert_eq!(result, Err(EnvelopeError::InvalidPrefix(hex!("deadbeef"))));
    }

    #[test]
    fn reject_unknown_message_type() {
        let payload = hex!("4c444752 00000014");
        let result = Envelope::split(&payload);
        assert_eq!(result, Err(EnvelopeError::UnknownMessageType(20)));
    }

    #[test]
    fn message_type_wire_values() {
        assert_eq!(MessageType::Broadcast.to_u32(), 30);
        assert_eq!(MessageType::from_u32(30), Some(MessageType::Broadcast));
        assert_eq!(MessageType::from_u32(0), None);
    }
}
