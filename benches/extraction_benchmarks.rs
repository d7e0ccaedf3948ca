//! Benchmarks for classification and frame extraction.
//!
//! Run with: cargo bench
//!
//! Fixtures are generated into a temporary directory at startup; no files
//! are checked in.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use criterion::Criterion;
use framecast::{FrameSink, dominant_color, extract_frames, has_transparency, is_animated};
use image::codecs::gif::GifEncoder;
use image::{Delay, DynamicImage, Frame, Rgba, RgbaImage};

struct DiscardSink;

impl FrameSink for DiscardSink {
    fn report_info(&self, _frame_count: u64, _path: &Path) {}

    fn emit_frame(&self, _payload: &str) {}
}

struct CountingSink {
    emitted: Mutex<u64>,
}

impl FrameSink for CountingSink {
    fn report_info(&self, _frame_count: u64, _path: &Path) {}

    fn emit_frame(&self, _payload: &str) {
        *self.emitted.lock().unwrap() += 1;
    }
}

fn write_sample_gif(path: &Path, frames: u32, edge: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = GifEncoder::new(file);
    encoder
        .encode_frames((0..frames).map(|index| {
            let buffer = RgbaImage::from_fn(edge, edge, |x, y| {
                Rgba([
                    ((x + index * 11) % 256) as u8,
                    ((y + index * 17) % 256) as u8,
                    ((x + y) % 256) as u8,
                    255,
                ])
            });
            Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(40, 1))
        }))
        .unwrap();
}

fn gradient_image(edge: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(edge, edge, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
}

fn benchmark_classification(criterion: &mut Criterion) {
    let directory = tempfile::tempdir().unwrap();
    let gif_path = directory.path().join("sample.gif");
    write_sample_gif(&gif_path, 8, 64);

    criterion.bench_function("is_animated (8-frame gif)", |bencher| {
        bencher.iter(|| {
            let animated = is_animated(&gif_path).unwrap();
            assert!(animated);
        });
    });

    let opaque = gradient_image(512);
    criterion.bench_function("has_transparency (512x512 opaque scan)", |bencher| {
        bencher.iter(|| {
            // Worst case: a fully opaque image forces a full scan.
            assert!(!has_transparency(&opaque));
        });
    });

    let sample = gradient_image(256);
    criterion.bench_function("dominant_color (256x256)", |bencher| {
        bencher.iter(|| {
            let _ = dominant_color(&sample);
        });
    });
}

fn benchmark_extraction(criterion: &mut Criterion) {
    let directory = tempfile::tempdir().unwrap();
    let gif_path = directory.path().join("sample.gif");
    write_sample_gif(&gif_path, 8, 64);

    criterion.bench_function("extract_frames (8-frame gif)", |bencher| {
        bencher.iter(|| {
            let summary = extract_frames(&gif_path, &DiscardSink).unwrap();
            assert_eq!(summary.frames_emitted, 8);
        });
    });

    criterion.bench_function("extract_frames with counting sink", |bencher| {
        bencher.iter(|| {
            let sink = CountingSink {
                emitted: Mutex::new(0),
            };
            extract_frames(&gif_path, &sink).unwrap();
        });
    });
}

criterion::criterion_group!(benches, benchmark_classification, benchmark_extraction);
criterion::criterion_main!(benches);
