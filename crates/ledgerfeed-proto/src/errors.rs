//! Error types for the broadcast wire format.
//!
//! Encoding errors are returned to whoever builds an outbound message.
//! Unpack and envelope errors describe why inbound bytes were rejected; the
//! decoder turns them into an invalid classification instead of failing.

use thiserror::Error;

/// Errors raised while building an outbound broadcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Text does not fit the one-byte length prefix
    #[error("text too long: {len} bytes exceeds maximum {max}")]
    TextTooLong {
        /// UTF-8 length of the rejected text
        len: usize,
        /// Maximum encodable length
        max: usize,
    },
}

/// Structural reasons a broadcast body could not be unpacked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnpackError {
    /// Body is shorter than the fixed header
    #[error("body too short: expected at least {expected} bytes, got {actual}")]
    BodyTooShort {
        /// Fixed header size
        expected: usize,
        /// Bytes received
        actual: usize,
    },

    /// Length prefix claims more text than the body holds
    #[error("text truncated: length prefix claims {expected} bytes, but only {actual} available")]
    TextTruncated {
        /// Length from the prefix byte
        expected: usize,
        /// Bytes left after the header
        actual: usize,
    },

    /// Bytes remain after the text
    #[error("trailing bytes: {extra} bytes after text")]
    TrailingBytes {
        /// Number of unexpected bytes
        extra: usize,
    },

    /// Text bytes are not UTF-8
    #[error("text is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Offset of the first invalid byte within the text
        valid_up_to: usize,
    },
}

/// Errors raised while splitting a full payload into type id and body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Payload is shorter than the envelope
    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Envelope size
        expected: usize,
        /// Bytes received
        actual: usize,
    },

    /// Payload does not start with the protocol prefix
    #[error("invalid protocol prefix: {0:02x?}")]
    InvalidPrefix([u8; 4]),

    /// Message type id is not one this crate understands
    #[error("unknown message type: {0}")]
    UnknownMessageType(u32),
}
