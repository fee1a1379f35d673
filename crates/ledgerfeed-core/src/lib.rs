//! ledgerfeed broadcast core logic
//!
//! Decoding and validity classification for broadcast messages, completely
//! decoupled from I/O. The feed-lock oracle and asset registry are supplied
//! by the caller as trait implementations, so the same code runs against a
//! live index, a persistent store, or test fakes.
//!
//! # Architecture
//!
//! [`BroadcastProcessor`] is a pure state transition: it takes one
//! transaction's payload and returns declarative [`BroadcastAction`]s
//! (persist the record, lock the feed, queue a settlement). A
//! [`storage::Storage`] implementation applies them. Processing the next
//! transaction against the updated storage is what makes a feed lock take
//! effect.
//!
//! # Components
//!
//! - [`decoder`]: two-stage unpack then lock check
//! - [`processor`]: per-transaction actions and the persisted record
//! - [`oracle`]: lock oracle and asset registry seams
//! - [`quote`]: price display and human summaries
//! - [`compose`]: outbound payload construction
//! - [`storage`]: in-memory and redb-backed persistence
//! - [`config`]: processor configuration
//! - [`error`]: storage and configuration errors

pub mod compose;
pub mod config;
pub mod decoder;
pub mod error;
pub mod oracle;
pub mod processor;
pub mod quote;
pub mod settlement;
pub mod storage;
pub mod transaction;
pub mod validity;

pub use compose::{ComposedBroadcast, compose};
pub use config::ProcessorConfig;
pub use decoder::{DecodedBroadcast, decode, decode_payload};
pub use error::{ConfigError, StorageError};
pub use oracle::{AssetRegistry, LockOracle, StaticAssetRegistry};
pub use processor::{BroadcastAction, BroadcastProcessor, BroadcastRecord};
pub use quote::{DisplayAmount, PriceQuote};
pub use settlement::SettlementTrigger;
pub use transaction::{Address, TransactionMeta};
pub use validity::Validity;
