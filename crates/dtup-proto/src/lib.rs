//! # DTUP: SysEx update container decoding
//!
//! A DTUP file carries a binary payload that was fragmented into 7-bit clean
//! SysEx messages for transport over a MIDI-style channel. This crate turns
//! such a file back into the flat 8-bit payload.
//!
//! ## File Layout
//!
//! ```text
//! [SPRC header, optional, 16 bytes]  CRC16/GENIBUS over everything after it
//! [DTUP container]
//!   "DTUP" size:u32 target:u32 version:[u8; 4]
//!   F0 43 41 7F 03 len_hi len_lo data.. checksum F7   (repeated)
//! ```
//!
//! All multi-byte integers are big endian.
//!
//! ## Decoding Pipeline
//!
//! - [`SprcHeader`] is detected by peeking, then validated against the raw
//!   remaining bytes before the container is touched.
//! - [`DtupContainer`] reads [`SysexMessage`]s until the declared size is
//!   reached or the next byte is not a SysEx start.
//! - [`PayloadAssembler`] concatenates the 7-bit data groups and re-slices
//!   them into bytes, dropping an incomplete final byte.
//!
//! [`decode`] runs the whole pipeline. The crate does no I/O; callers hand
//! it a byte slice.
//!
//! Encoding is deliberately unsupported: the 8-to-7-bit fragmentation
//! convention is unknown, so the `encode` methods return
//! [`ProtocolError::NotImplemented`]. Only [`SprcHeader`] can be written.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod checksum;
pub mod container;
pub mod decode;
pub mod errors;
pub mod payload;
pub mod sprc;
pub mod sysex;

pub use bits::{BitReader, BitWriter};
pub use container::DtupContainer;
pub use decode::{DecodeConfig, Decoded, decode, decode_with};
pub use errors::{FramingField, ProtocolError, Result};
pub use payload::PayloadAssembler;
pub use sprc::SprcHeader;
pub use sysex::SysexMessage;
