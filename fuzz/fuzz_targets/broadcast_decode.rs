//! Random-input fuzzer for broadcast decoding
//!
//! Feeds arbitrary bytes to the payload decoder and checks the
//! classification rules that must hold for every input:
//! - decoding never panics
//! - `CouldNotUnpack` never carries fields, other tags always do
//! - anything that unpacks re-encodes to the identical payload

#![no_main]

use ledgerfeed_core::{Address, Validity, decode_payload};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let source = Address::new("1FuzzFeed");
    let decoded = decode_payload(data, &source, &|_: &Address| false);

    match (decoded.validity, decoded.message) {
        (Validity::CouldNotUnpack, None) => {},
        (Validity::Valid, Some(message)) => {
            let encoded = message.to_bytes().expect("unpacked text always fits");
            assert_eq!(encoded.as_slice(), data, "re-encoding must be byte exact");
        },
        (validity, message) => {
            panic!("inconsistent decode: {validity:?} with {message:?}");
        },
    }
});
