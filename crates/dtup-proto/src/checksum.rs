//! Message checksum and header CRC.
//!
//! These are unrelated algorithms guarding different layers: the 7-bit
//! checksum protects a single SysEx message, the CRC protects the whole file
//! body behind an SPRC header.

use crc::{CRC_16_GENIBUS, Crc};

const GENIBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_GENIBUS);

/// Two's-complement of the byte sum, masked to 7 bits.
///
/// The result `c` satisfies `(sum(bytes) + c) % 128 == 0`. For a SysEx
/// message the input is the 2-byte length field followed by the data field.
pub fn message_checksum<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> u8 {
    let sum = bytes.into_iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg() & 0x7F
}

/// CRC16/GENIBUS (poly 0x1021, init 0xFFFF, no reflection, xorout 0xFFFF).
#[must_use]
pub fn crc16_genibus(data: &[u8]) -> u16 {
    GENIBUS.checksum(data)
}
