//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions, and that truncated-input tolerance downgrades a
//! mid-stream failure to a shorter, clean stream.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use framecast::{
    DecodeOptions, ExtractOptions, FrameSink, extract_frames, extract_frames_with, is_animated,
};
use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, Rgba, RgbaImage};

#[derive(Default)]
struct CollectSink {
    payloads: Mutex<Vec<String>>,
}

impl FrameSink for CollectSink {
    fn report_info(&self, _frame_count: u64, _path: &Path) {}

    fn emit_frame(&self, payload: &str) {
        self.payloads.lock().unwrap().push(payload.to_string());
    }
}

/// Write a GIF whose frames are noisy enough that a truncation lands inside
/// frame data rather than between frames.
fn write_noisy_gif(path: &Path, frames: u32) {
    let file = File::create(path).expect("create gif fixture");
    let mut encoder = GifEncoder::new(file);
    encoder
        .encode_frames((0..frames).map(|index| {
            let buffer = RgbaImage::from_fn(64, 64, |x, y| {
                let value = ((x * 7 + y * 13 + index * 29) % 251) as u8;
                Rgba([value, value.wrapping_mul(3), value.wrapping_add(index as u8), 255])
            });
            Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(50, 1))
        }))
        .expect("encode gif fixture");
}

fn truncated_copy(original: &Path, directory: &Path) -> PathBuf {
    let bytes = fs::read(original).unwrap();
    let cut = bytes.len() * 3 / 5;
    let target = directory.join("truncated.gif");
    fs::write(&target, &bytes[..cut]).unwrap();
    target
}

// ── Open failures ──────────────────────────────────────────────────

#[test]
fn open_nonexistent_file() {
    let result = is_animated("this_file_does_not_exist.gif");
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open image file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn extract_from_nonexistent_file_reports_nothing() {
    let sink = CollectSink::default();
    let result = extract_frames("missing.gif", &sink);
    assert!(result.is_err());
    assert!(sink.payloads.lock().unwrap().is_empty());
}

#[test]
fn garbage_bytes_with_image_extension() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_path = directory.path().join("invalid.gif");
    fs::write(&invalid_path, b"this is not an image file").unwrap();

    assert!(is_animated(&invalid_path).is_err());
    let sink = CollectSink::default();
    assert!(extract_frames(&invalid_path, &sink).is_err());
}

#[test]
fn garbage_bytes_without_recognisable_format() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_path = directory.path().join("payload.bin");
    fs::write(&invalid_path, b"\x00\x01\x02\x03 nothing to see here").unwrap();

    let result = is_animated(&invalid_path);
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("format"),
        "Error message should mention the unrecognised format: {error_message}",
    );
}

// ── Truncated input ────────────────────────────────────────────────

#[test]
fn truncated_stream_fails_under_strict_decoding() {
    let directory = tempfile::tempdir().unwrap();
    let original = directory.path().join("full.gif");
    write_noisy_gif(&original, 10);
    let truncated = truncated_copy(&original, directory.path());

    let sink = CollectSink::default();
    let result = extract_frames(&truncated, &sink);
    assert!(result.is_err(), "strict decoding should surface truncation");
}

#[test]
fn truncated_stream_ends_cleanly_when_tolerated() {
    let directory = tempfile::tempdir().unwrap();
    let original = directory.path().join("full.gif");
    write_noisy_gif(&original, 10);
    let truncated = truncated_copy(&original, directory.path());

    let options = ExtractOptions::new()
        .with_decode(DecodeOptions::new().with_tolerate_truncation(true));

    let sink = CollectSink::default();
    let summary =
        extract_frames_with(&truncated, &sink, &options).expect("tolerated truncation is clean");

    assert!(!summary.cancelled);
    assert!(summary.frames_emitted < 10, "cut file cannot yield all frames");
    assert_eq!(summary.frames_emitted, summary.frame_count);
    assert_eq!(
        summary.frames_emitted,
        sink.payloads.lock().unwrap().len() as u64
    );
}
