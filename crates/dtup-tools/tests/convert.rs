//! File conversion tests against a temporary directory.

use std::fs;

use dtup_proto::{DecodeConfig, ProtocolError, SprcHeader, checksum::message_checksum};
use dtup_tools::{ConvertError, ConvertSummary, convert};
use tempfile::TempDir;

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
    out.extend_from_slice(&0x0000_0042u32.to_be_bytes());
    out.extend_from_slice(&[0, 1, 0, 0]);
    out.extend_from_slice(frames);
    out
}

fn with_header(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    SprcHeader::new(1, 0, [0; 7], body).encode(&mut out);
    out.extend_from_slice(body);
    out
}

#[test]
fn converts_plain_container() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("update.dtup");
    let destination = dir.path().join("update.bin");
    fs::write(&source, dtup(&frame(&[0x7F; 8]))).unwrap();

    let summary = convert(&source, &destination, &DecodeConfig::default()).unwrap();

    assert_eq!(
        summary,
        ConvertSummary { had_header: false, target: 0x42, messages: 1, payload_len: 7 }
    );
    assert_eq!(fs::read(&destination).unwrap(), vec![0xFF; 7]);
}

#[test]
fn converts_container_behind_header() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("update.dtup");
    let destination = dir.path().join("update.bin");
    let mut frames = frame(&[0x41]);
    frames.extend(frame(&[0x01]));
    fs::write(&source, with_header(&dtup(&frames))).unwrap();

    let summary = convert(&source, &destination, &DecodeConfig::default()).unwrap();

    assert!(summary.had_header);
    assert_eq!(summary.messages, 2);
    assert_eq!(fs::read(&destination).unwrap(), vec![0x82]);
}

#[test]
fn failed_conversion_leaves_destination_untouched() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("update.dtup");
    let destination = dir.path().join("update.bin");
    let mut input = with_header(&dtup(&frame(&[0x41, 0x01])));
    let last = input.len() - 1;
    input[last] ^= 0x01;
    fs::write(&source, input).unwrap();
    fs::write(&destination, b"previous").unwrap();

    let err = convert(&source, &destination, &DecodeConfig::default()).unwrap_err();

    assert!(matches!(err, ConvertError::Decode(ProtocolError::HeaderCrcMismatch { .. })));
    assert_eq!(fs::read(&destination).unwrap(), b"previous");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn missing_source_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = convert(
        &dir.path().join("absent.dtup"),
        &dir.path().join("out.bin"),
        &DecodeConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ConvertError::Read { .. }));
    assert!(!dir.path().join("out.bin").exists());
}

#[test]
fn missing_destination_directory_is_a_write_error() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("update.dtup");
    fs::write(&source, dtup(&frame(&[0x01]))).unwrap();

    let err = convert(&source, &dir.path().join("nope/out.bin"), &DecodeConfig::default())
        .unwrap_err();

    assert!(matches!(err, ConvertError::Write { .. }));
}
