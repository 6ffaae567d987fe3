//! Reassembly of the 8-bit payload from 7-bit message data.

use bytes::Bytes;

use crate::{bits::BitWriter, sysex::SysexMessage};

/// Width of one transport group
const GROUP_BITS: u32 = 7;

/// Concatenates 7-bit groups into a bitstream and re-slices it into bytes.
///
/// Groups are appended in message order, then data order. The final
/// incomplete byte, if any, is discarded rather than padded.
#[derive(Debug, Clone, Default)]
pub struct PayloadAssembler {
    bits: BitWriter,
}

impl PayloadAssembler {
    /// Create an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low 7 bits of each byte in `data`.
    pub fn push_data(&mut self, data: &[u8]) {
        for &byte in data {
            self.bits.append_bits(u32::from(byte & 0x7F), GROUP_BITS);
        }
    }

    /// Append the data field of one message.
    pub fn push_message(&mut self, message: &SysexMessage) {
        self.push_data(message.data());
    }

    /// Bits appended so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bits.bit_len()
    }

    /// Return `bit_len / 8` whole bytes.
    #[must_use]
    pub fn finish(self) -> Bytes {
        Bytes::from(self.bits.into_bytes())
    }
}

/// Assemble the payload carried by `messages`.
#[must_use]
pub fn assemble<'a>(messages: impl IntoIterator<Item = &'a SysexMessage>) -> Bytes {
    let mut assembler = PayloadAssembler::new();
    for message in messages {
        assembler.push_message(message);
    }
    assembler.finish()
}
