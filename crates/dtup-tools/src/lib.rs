//! File-level conversion of DTUP containers.
//!
//! This is the I/O shell around [`dtup_proto`]: read the whole source file,
//! decode it in memory, and write the payload next to the destination. The
//! payload lands in a temporary file in the destination directory that is
//! renamed over the destination only after the write succeeded, so a failed
//! conversion never leaves a truncated output behind.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use dtup_proto::{DecodeConfig, ProtocolError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from a file conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Source file could not be read
    #[error("failed to read {}", path.display())]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Output could not be written
    #[error("failed to write {}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Completed output could not be moved into place
    #[error("failed to move output into {}", path.display())]
    Persist {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Source is not a valid DTUP file
    #[error("invalid DTUP file")]
    Decode(#[from] ProtocolError),
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Whether the source carried an SPRC header
    pub had_header: bool,
    /// Target identifier from the container
    pub target: u32,
    /// Number of SysEx messages read
    pub messages: usize,
    /// Bytes written to the destination
    pub payload_len: usize,
}

/// Convert the DTUP file at `source` into a raw payload at `destination`.
///
/// # Errors
///
/// Returns [`ConvertError`] if the source cannot be read, does not decode,
/// or the destination cannot be written. The destination is untouched on
/// every error path.
pub fn convert(
    source: &Path,
    destination: &Path,
    config: &DecodeConfig,
) -> Result<ConvertSummary, ConvertError> {
    let input = fs::read(source).map_err(|source_err| ConvertError::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    tracing::debug!(path = %source.display(), len = input.len(), "read source");

    let decoded = dtup_proto::decode_with(&input, config)?;
    write_atomic(destination, &decoded.payload)?;

    let summary = ConvertSummary {
        had_header: decoded.header.is_some(),
        target: decoded.container.target(),
        messages: decoded.container.messages().len(),
        payload_len: decoded.payload.len(),
    };
    tracing::info!(
        destination = %destination.display(),
        messages = summary.messages,
        payload_len = summary.payload_len,
        "wrote payload"
    );
    Ok(summary)
}

fn write_atomic(destination: &Path, payload: &[u8]) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::Write { path: destination.to_path_buf(), source };

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(payload).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(destination).map_err(|err| ConvertError::Persist {
        path: destination.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
