//! End-to-end decoding of a DTUP file held in memory.
//!
//! Order of operations:
//! 1. If the input starts with an SPRC header, read it and check its CRC
//!    against the raw bytes after it. A mismatch aborts before any container
//!    byte is interpreted.
//! 2. Read the DTUP container from the remaining bytes.
//! 3. Reassemble the payload from the container's messages.

use bytes::Bytes;

use crate::{
    DtupContainer, SprcHeader,
    bits::BitReader,
    checksum::crc16_genibus,
    errors::{ProtocolError, Result},
};

/// Decoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Reject files whose SPRC header CRC does not match the content.
    /// Disabling this still reads the header, but only logs the mismatch.
    pub verify_header_crc: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { verify_header_crc: true }
    }
}

/// Result of decoding one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// SPRC header, if the file had one
    pub header: Option<SprcHeader>,
    /// Parsed container
    pub container: DtupContainer,
    /// Reassembled 8-bit payload
    pub payload: Bytes,
}

/// Decode `input` with the default configuration.
///
/// # Errors
///
/// See [`decode_with`].
pub fn decode(input: &[u8]) -> Result<Decoded> {
    decode_with(input, &DecodeConfig::default())
}

/// Decode `input`.
///
/// # Errors
///
/// - [`ProtocolError::HeaderCrcMismatch`] if an SPRC header is present, its
///   CRC does not match and `config.verify_header_crc` is set
/// - any error from [`SprcHeader::read`] or [`DtupContainer::read`]
pub fn decode_with(input: &[u8], config: &DecodeConfig) -> Result<Decoded> {
    let mut reader = BitReader::new(input);

    let header = if SprcHeader::detect(&reader) {
        let header = SprcHeader::read(&mut reader)?;
        tracing::debug!(?header, "found SPRC header");
        check_header(&header, reader.rest(), config)?;
        Some(header)
    } else {
        tracing::debug!("no SPRC header, reading container from offset 0");
        None
    };

    let container = DtupContainer::read(&mut reader)?;
    let payload = container.payload();

    tracing::debug!(
        messages = container.messages().len(),
        payload_len = payload.len(),
        "decoded DTUP payload"
    );

    Ok(Decoded { header, container, payload })
}

fn check_header(header: &SprcHeader, remaining: &[u8], config: &DecodeConfig) -> Result<()> {
    if header.validate(remaining) {
        return Ok(());
    }

    let expected = header.crc_value();
    let actual = crc16_genibus(remaining);
    if !config.verify_header_crc {
        tracing::warn!(expected, actual, "ignoring SPRC header CRC mismatch");
        return Ok(());
    }

    tracing::error!(expected, actual, "SPRC header CRC mismatch");
    Err(ProtocolError::HeaderCrcMismatch { expected, actual })
}
