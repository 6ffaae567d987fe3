//! Snapshot tests for wire format stability.
//!
//! Byte-exact expectations for the framing, the header writer and the 7-bit
//! repacking. If any of these change, previously converted files would no
//! longer round-trip.

use dtup_proto::{
    DtupContainer, SprcHeader, SysexMessage, checksum::message_checksum, decode,
    payload::assemble,
};
use insta::assert_snapshot;

/// Build a well-formed SysEx frame around `data`
fn frame(data: &[u8]) -> Vec<u8> {
    let length =
        [u8::try_from(data.len() >> 7).unwrap(), u8::try_from(data.len() & 0x7F).unwrap()];
    let mut out = vec![0xF0, 0x43, 0x41, 0x7F, 0x03];
    out.extend_from_slice(&length);
    out.extend_from_slice(data);
    out.push(message_checksum(length.iter().chain(data)));
    out.push(0xF7);
    out
}

fn dtup(frames: &[u8]) -> Vec<u8> {
    let mut out = b"DTUP".to_vec();
    out.extend_from_slice(&u32::try_from(frames.len()).unwrap().to_be_bytes());
    out.extend_from_slice(&0xCAFE_0001u32.to_be_bytes());
    out.extend_from_slice(&[1, 2, 3, 4]);
    out.extend_from_slice(frames);
    out
}

// =============================================================================
// Framing
// =============================================================================

#[test]
fn snapshot_single_frame() {
    let bytes = frame(&[1, 2, 3, 4, 5, 6, 7]);
    assert_snapshot!(hex::encode(bytes), @"f043417f030007010203040506075df7");
}

#[test]
fn snapshot_sprc_header() {
    let header = SprcHeader::new(
        0x0102,
        0x01,
        [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6],
        b"123456789",
    );
    assert_snapshot!(hex::encode(header.to_bytes()), @"535052430102d64e01a0a1a2a3a4a5a6");
}

// =============================================================================
// Payload reassembly
// =============================================================================

#[test]
fn snapshot_end_to_end_payload() {
    let decoded = decode(&dtup(&frame(&[1, 2, 3, 4, 5, 6, 7]))).expect("decode should succeed");

    assert_eq!(decoded.container.messages().len(), 1);
    assert_snapshot!(hex::encode(&decoded.payload), @"02081840a183");
}

#[test]
fn snapshot_payload_across_messages() {
    let messages = [SysexMessage::new(vec![0x7F; 8]), SysexMessage::new(vec![0x00; 8])];
    assert_snapshot!(hex::encode(assemble(&messages)), @"ffffffffffffff00000000000000");
}

#[test]
fn snapshot_payload_uneven_messages() {
    let mut frames = frame(b"HELLO");
    frames.extend(frame(b"WORLD!!"));
    let container = DtupContainer::decode(&dtup(&frames)).expect("decode should succeed");

    assert_snapshot!(hex::encode(container.payload()), @"911664c9f5e7d299110a");
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn snapshot_checksum_error() {
    let mut bytes = dtup(&frame(&[0x10, 0x20]));
    let trailer = bytes.len() - 2;
    bytes[trailer] = 0x00;

    let err = decode(&bytes).expect_err("checksum must fail");
    assert_snapshot!(err.to_string(), @"checksum mismatch: computed 0x4e, trailer 0x00");
}
