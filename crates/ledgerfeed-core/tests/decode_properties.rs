//! Property-based tests for broadcast decoding.
//!
//! These verify the classification rules hold for all inputs:
//! - Encoded broadcasts decode to the same fields
//! - A locked source is never `Valid`
//! - Structural failures never carry fields and never reach the oracle
//! - Arbitrary bytes never panic

use std::cell::Cell;

use ledgerfeed_core::{Address, Validity, compose, decode, decode_payload};
use ledgerfeed_proto::BroadcastMessage;
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    ".{0,80}".prop_filter("fits length prefix", |s| s.len() <= BroadcastMessage::MAX_TEXT_LEN)
}

fn message_strategy() -> impl Strategy<Value = BroadcastMessage> {
    (any::<u32>(), any::<u64>(), any::<u64>(), any::<u32>(), text_strategy()).prop_map(
        |(timestamp, asset, amount, fee, text)| BroadcastMessage::new(timestamp, asset, amount, fee, text),
    )
}

fn payload_for(message: &BroadcastMessage) -> Vec<u8> {
    compose(
        Address::new("1Feed"),
        message.timestamp,
        message.price_asset_id,
        message.price_amount,
        message.fee_multiplier,
        &message.text,
    )
    .expect("text fits")
    .data
}

proptest! {
    #[test]
    fn prop_round_trip_is_valid(message in message_strategy()) {
        let payload = payload_for(&message);
        let decoded = decode_payload(&payload, &Address::new("1Feed"), &|_: &Address| false);

        prop_assert_eq!(decoded.validity, Validity::Valid);
        prop_assert_eq!(decoded.message, Some(message));
    }

    #[test]
    fn prop_locked_source_never_valid(message in message_strategy()) {
        let payload = payload_for(&message);
        let decoded = decode_payload(&payload, &Address::new("1Feed"), &|_: &Address| true);

        prop_assert_eq!(decoded.validity, Validity::AddressLocked);
        prop_assert_eq!(decoded.message, Some(message));
    }

    #[test]
    fn prop_truncation_precedes_lock(message in message_strategy(), cut in 1usize..=40) {
        let payload = payload_for(&message);
        let keep = payload.len().saturating_sub(cut).max(8);
        prop_assume!(keep < payload.len());

        let calls = Cell::new(0u32);
        let oracle = |_: &Address| {
            calls.set(calls.get() + 1);
            true
        };
        let decoded = decode_payload(&payload[..keep], &Address::new("1Feed"), &oracle);

        prop_assert_eq!(decoded.validity, Validity::CouldNotUnpack);
        prop_assert_eq!(decoded.message, None);
        prop_assert_eq!(calls.get(), 0);
    }

    #[test]
    fn prop_decode_is_idempotent(body in prop::collection::vec(any::<u8>(), 0..300), locked in any::<bool>()) {
        let oracle = move |_: &Address| locked;
        let first = decode(&body, &Address::new("1Feed"), &oracle);
        let second = decode(&body, &Address::new("1Feed"), &oracle);
        prop_assert_eq!(first, second);
    }
}
