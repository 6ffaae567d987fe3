//! Negative space fuzzer: arbitrary bytes through the full decoder.
//!
//! The decoder must return `Ok` or `Err` for every input, never panic. The
//! input is tried both as-is and behind a valid SPRC header so that the
//! container parser is reached even when the fuzzer does not guess a CRC.

#![no_main]

use dtup_proto::{DecodeConfig, SprcHeader, decode_with};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = DecodeConfig::default();
    let _ = decode_with(data, &config);

    let mut wrapped = Vec::with_capacity(SprcHeader::SIZE + data.len());
    SprcHeader::new(1, 0, [0; 7], data).encode(&mut wrapped);
    wrapped.extend_from_slice(data);

    // A header built over these exact bytes can never fail its CRC.
    if let Err(err) = decode_with(&wrapped, &config) {
        assert!(
            !matches!(err, dtup_proto::ProtocolError::HeaderCrcMismatch { .. }),
            "self-consistent header rejected: {err}"
        );
    }
});
