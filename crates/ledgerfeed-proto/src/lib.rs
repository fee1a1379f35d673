//! Wire format for ledgerfeed broadcast messages.
//!
//! A broadcast travels inside a base-chain transaction as an opaque payload:
//! an 8-byte envelope (protocol prefix + message type id) followed by the
//! message body. The body is a fixed 25-byte big-endian header whose last
//! byte is the length of the UTF-8 text that follows.
//!
//! ```text
//! offset  size  field
//! 0       4     protocol prefix
//! 4       4     message type id (30)
//! 8       4     timestamp
//! 12      8     price_asset_id
//! 20      8     price_amount
//! 28      4     fee_multiplier
//! 32      1     text length N
//! 33      N     text
//! ```
//!
//! The envelope and body headers are cast from untrusted bytes with
//! `zerocopy`, so every byte pattern is a valid header and parsing can only
//! fail on length or UTF-8 checks.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod broadcast;
pub mod envelope;
pub mod errors;
pub mod header;

pub use broadcast::{BroadcastMessage, FEE_MULTIPLIER_SCALE, encode};
pub use envelope::{Envelope, MessageType};
pub use errors::{EncodingError, EnvelopeError, UnpackError};
pub use header::BroadcastHeader;
