//! DTUP container: fixed metadata followed by a run of SysEx messages.
//!
//! Layout on the wire:
//! `["DTUP"] [size: u32] [target: u32] [version: 4 bytes] [SysEx frames...]`
//!
//! `size` counts the bytes of the frame region only. It is advisory: the
//! frame stream itself decides where the messages end.

use bytes::{BufMut, Bytes};

use crate::{
    bits::BitReader,
    errors::{ProtocolError, Result},
    payload,
    sysex::SysexMessage,
};

/// Decoded DTUP container.
///
/// # Invariants
///
/// - `messages` is in stream order, which is also payload order.
/// - The container is immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtupContainer {
    declared_size: u32,
    target: u32,
    version: [u8; 4],
    messages: Vec<SysexMessage>,
}

impl DtupContainer {
    /// Magic bytes: "DTUP"
    pub const MAGIC: [u8; 4] = *b"DTUP";

    /// Bytes of fixed fields ahead of the frame region
    pub const FIXED_SIZE: usize = 16;

    /// Decode a container from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// See [`Self::read`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut BitReader::new(bytes))
    }

    /// Read a container from the reader's current position.
    ///
    /// Messages are collected while fewer than `size` bytes of the frame
    /// region have been consumed and the next message starts with `0xF0`.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InvalidMagic`] if the magic is not "DTUP"
    /// - [`ProtocolError::ShortRead`] if the fixed fields are cut off
    /// - any error from [`SysexMessage::read`]; a malformed message is never
    ///   skipped
    pub fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let container_start = reader.position();
        let magic: [u8; 4] = reader.read_array()?;
        if magic != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic { expected: Self::MAGIC, actual: magic });
        }
        let declared_size = reader.read_u32_be()?;
        let target = reader.read_u32_be()?;
        let version: [u8; 4] = reader.read_array()?;

        tracing::debug!(
            declared_size,
            target = format_args!("{target:#010x}"),
            version = ?version,
            "DTUP container header"
        );

        let region_start = container_start + Self::FIXED_SIZE;
        let mut messages = Vec::new();
        while reader.bytes_consumed_since(region_start) < declared_size as usize {
            match SysexMessage::read(reader)? {
                Some(message) => messages.push(message),
                None => break,
            }
        }

        let consumed = reader.bytes_consumed_since(region_start);
        if consumed != declared_size as usize {
            tracing::warn!(
                declared_size,
                consumed,
                "frame region length disagrees with declared size"
            );
        }
        tracing::debug!(messages = messages.len(), consumed, "read DTUP messages");

        Ok(Self { declared_size, target, version, messages })
    }

    /// Declared length of the frame region
    #[must_use]
    pub fn declared_size(&self) -> u32 {
        self.declared_size
    }

    /// Target device identifier (opaque)
    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Version bytes (opaque)
    #[must_use]
    pub fn version(&self) -> &[u8; 4] {
        &self.version
    }

    /// Messages in stream order
    #[must_use]
    pub fn messages(&self) -> &[SysexMessage] {
        &self.messages
    }

    /// Reassemble the 8-bit payload carried by all messages.
    #[must_use]
    pub fn payload(&self) -> Bytes {
        payload::assemble(&self.messages)
    }

    /// Encoding a container is not supported.
    ///
    /// # Errors
    ///
    /// Always [`ProtocolError::NotImplemented`].
    pub fn encode(&self, _dst: &mut impl BufMut) -> Result<()> {
        Err(ProtocolError::NotImplemented("DTUP container encoding"))
    }
}
