//! Positive space fuzzer for well-formed containers.
//!
//! The fuzzer input is cut into 7-bit data fields, each wrapped in a valid
//! SysEx frame. Edge-case declared sizes are tried for every container:
//! - exact frame region length
//! - zero
//! - larger than the region (advisory size)
//!
//! Invariants checked:
//! - decoding always succeeds
//! - messages come back in order with their data intact
//! - the payload is `floor(7 * groups / 8)` bytes long

#![no_main]

use dtup_proto::{DtupContainer, checksum::message_checksum};
use libfuzzer_sys::fuzz_target;

// Data field lengths that stress the two-byte 7-bit length encoding
const CHUNK_LENGTHS: &[usize] = &[0, 1, 7, 8, 127, 128, 129, 255];

fn frame(data: &[u8], out: &mut Vec<u8>) {
    let length = [((data.len() >> 7) & 0x7F) as u8, (data.len() & 0x7F) as u8];
    out.extend_from_slice(&[0xF0, 0x43, 0x41, 0x7F, 0x03]);
    out.extend_from_slice(&length);
    out.extend_from_slice(data);
    out.push(message_checksum(length.iter().chain(data)));
    out.push(0xF7);
}

fn container(size: u32, frames: &[u8]) -> Vec<u8> {
    let mut out = DtupContainer::MAGIC.to_vec();
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(frames);
    out
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let seven_bit: Vec<u8> = rest.iter().map(|b| b & 0x7F).collect();

    let mut chunks = Vec::new();
    let mut remaining = seven_bit.as_slice();
    let mut pick = selector as usize;
    while !remaining.is_empty() {
        let len = CHUNK_LENGTHS[pick % CHUNK_LENGTHS.len()].min(remaining.len());
        let (chunk, tail) = remaining.split_at(len);
        chunks.push(chunk);
        remaining = tail;
        pick = pick.wrapping_mul(31).wrapping_add(7);
    }

    let mut frames = Vec::new();
    for chunk in &chunks {
        frame(chunk, &mut frames);
    }
    let exact = frames.len() as u32;

    for size in [exact, 0, exact.saturating_add(1), u32::MAX] {
        let dtup = DtupContainer::decode(&container(size, &frames))
            .expect("well-formed container must decode");

        let expected = if size == 0 { 0 } else { chunks.len() };
        assert_eq!(dtup.messages().len(), expected, "message count for size={size}");

        for (message, chunk) in dtup.messages().iter().zip(&chunks) {
            assert_eq!(message.data().as_ref(), *chunk);
        }

        let groups: usize = dtup.messages().iter().map(|m| m.data().len()).sum();
        assert_eq!(dtup.payload().len(), groups * 7 / 8);
    }
});
