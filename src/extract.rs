//! The frame extraction loop.
//!
//! [`extract_frames`] opens an image file, reports its frame count to the
//! host sink, picks one output format for the whole file, and then walks the
//! frames in order: poll the sink for cancellation, decode, re-encode,
//! base64-wrap, emit. Everything runs synchronously on the calling thread;
//! the source decoder and encode buffers are released when the call returns,
//! on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framecast::{ExtractError, FrameSink, extract_frames};
//!
//! struct CollectSink(std::sync::Mutex<Vec<String>>);
//!
//! impl FrameSink for CollectSink {
//!     fn report_info(&self, frame_count: u64, path: &Path) {
//!         eprintln!("{} -> {frame_count} frame(s)", path.display());
//!     }
//!
//!     fn emit_frame(&self, payload: &str) {
//!         self.0.lock().unwrap().push(payload.to_string());
//!     }
//! }
//!
//! let sink = CollectSink(Default::default());
//! let summary = extract_frames("banner.gif", &sink)?;
//! assert_eq!(summary.frames_emitted, sink.0.lock().unwrap().len() as u64);
//! # Ok::<(), ExtractError>(())
//! ```

use std::path::Path;

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{RgbImage, RgbaImage};

use crate::decode::{DecodedFrame, FrameStream, count_frames};
use crate::error::ExtractError;
use crate::options::ExtractOptions;
use crate::payload::{FramePayload, OutputFormat};
use crate::sink::FrameSink;

/// Outcome of one [`extract_frames`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Total frames in the source, as reported to the sink.
    pub frame_count: u64,
    /// Frames actually emitted. Equals `frame_count` unless cancelled.
    pub frames_emitted: u64,
    /// The output format chosen for the whole file.
    pub format: OutputFormat,
    /// Whether the host halted extraction early. Cancellation is a clean
    /// termination, not an error.
    pub cancelled: bool,
}

/// Extract every frame of the image at `path` through `sink`, with default
/// options.
///
/// See [`extract_frames_with`] for the full contract.
pub fn extract_frames<P, S>(path: P, sink: &S) -> Result<ExtractSummary, ExtractError>
where
    P: AsRef<Path>,
    S: FrameSink + ?Sized,
{
    extract_frames_with(path, sink, &ExtractOptions::default())
}

/// Extract every frame of the image at `path` through `sink`.
///
/// Reports the frame count via [`FrameSink::report_info`] exactly once
/// before any frame, then visits frame indices in ascending order with no
/// gaps. Before decoding each frame the sink is polled via
/// [`FrameSink::stop_requested`]; a `true` answer stops the loop without
/// emitting that frame or any later one and returns a summary with
/// [`cancelled`](ExtractSummary::cancelled) set.
///
/// The output format is chosen once, for the whole file: lossless WebP when
/// the first frame has transparency or the source layout declares an alpha
/// channel, JPEG at the configured quality otherwise.
///
/// # Errors
///
/// Failure to open or parse the source is fatal for the whole call and no
/// frame is reported or emitted. A decode or encode failure on an
/// individual frame aborts the remaining loop; frames already handed to the
/// sink are not retracted.
pub fn extract_frames_with<P, S>(
    path: P,
    sink: &S,
    options: &ExtractOptions,
) -> Result<ExtractSummary, ExtractError>
where
    P: AsRef<Path>,
    S: FrameSink + ?Sized,
{
    let path = path.as_ref();

    // Counting drains a stream of its own; the emission loop below decodes
    // lazily so cancellation can land between frames.
    let frame_count = count_frames(path, &options.decode)?;
    let mut stream = FrameStream::open(path, &options.decode)?;

    log::debug!("Extracting {frame_count} frame(s) from {}", path.display());
    sink.report_info(frame_count, path);

    // The first frame doubles as the transparency probe for the whole file,
    // so decode it up front and hand it to iteration 0 of the loop.
    let first = match stream.next_frame() {
        Some(frame) => frame?,
        None => {
            return Err(ExtractError::FrameDecode {
                frame_index: 0,
                reason: "source contains no decodable frames".to_string(),
            });
        }
    };

    let format = choose_output_format(&stream, &first.image);
    log::debug!("Chose {format} output for {}", path.display());

    let mut pending = Some(first);
    let mut frames_emitted = 0;

    for frame_index in 0..frame_count {
        if sink.stop_requested(path) {
            log::debug!(
                "Host stopped extraction of {} at frame {frame_index}",
                path.display()
            );
            return Ok(ExtractSummary {
                frame_count,
                frames_emitted,
                format,
                cancelled: true,
            });
        }

        let frame = match pending.take() {
            Some(frame) => frame,
            None => match stream.next_frame() {
                Some(frame) => frame?,
                None => {
                    return Err(ExtractError::FrameDecode {
                        frame_index,
                        reason: "frame stream ended before the reported count".to_string(),
                    });
                }
            },
        };

        let duration_millis = frame_duration_millis(&frame, frame_count, frame_index)?;
        let bytes = encode_frame(&frame.image, format, options.jpeg_quality, frame_index)?;
        let payload = FramePayload::from_encoded_bytes(format, path, duration_millis, &bytes);

        sink.emit_frame(&payload.to_string());
        frames_emitted += 1;
        log::trace!(
            "Emitted frame {frame_index} of {} ({} byte(s), {duration_millis} ms)",
            path.display(),
            bytes.len()
        );
    }

    Ok(ExtractSummary {
        frame_count,
        frames_emitted,
        format,
        cancelled: false,
    })
}

/// Pick the output format for a whole file.
///
/// Alpha-capable WebP when transparency must survive re-encoding, JPEG
/// otherwise.
fn choose_output_format(stream: &FrameStream, first_frame: &RgbaImage) -> OutputFormat {
    if stream.source_alpha() || rgba_has_transparency(first_frame) {
        OutputFormat::Webp
    } else {
        OutputFormat::Jpeg
    }
}

fn rgba_has_transparency(image: &RgbaImage) -> bool {
    image.pixels().any(|pixel| pixel.0[3] < u8::MAX)
}

fn frame_duration_millis(
    frame: &DecodedFrame,
    frame_count: u64,
    frame_index: u64,
) -> Result<u64, ExtractError> {
    match frame.duration {
        Some(duration) => Ok(duration.as_millis() as u64),
        // A static single frame has no timing; animated frames must.
        None if frame_count > 1 => Err(ExtractError::MissingFrameDuration { frame_index }),
        None => Ok(0),
    }
}

/// Re-encode one RGBA frame to the chosen output format, in memory.
fn encode_frame(
    frame: &RgbaImage,
    format: OutputFormat,
    jpeg_quality: u8,
    frame_index: u64,
) -> Result<Vec<u8>, ExtractError> {
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb: RgbImage = frame.convert();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, jpeg_quality))
        }
        OutputFormat::Webp => frame.write_with_encoder(WebPEncoder::new_lossless(&mut bytes)),
    };
    result.map_err(|error| ExtractError::FrameEncode {
        frame_index,
        reason: error.to_string(),
    })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn jpeg_frames_decode_back() {
        let frame = RgbaImage::from_pixel(12, 9, Rgba([120, 60, 30, 255]));
        let bytes = encode_frame(&frame, OutputFormat::Jpeg, 95, 0).expect("jpeg encode");
        let decoded =
            image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (12, 9));
    }

    #[test]
    fn webp_frames_preserve_alpha() {
        let mut frame = RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]));
        frame.put_pixel(3, 3, Rgba([0, 255, 0, 0]));
        let bytes = encode_frame(&frame, OutputFormat::Webp, 95, 0).expect("webp encode");
        let decoded =
            image::load_from_memory_with_format(&bytes, image::ImageFormat::WebP).expect("decode");
        assert_eq!(decoded.to_rgba8().get_pixel(3, 3).0[3], 0);
    }

    #[test]
    fn opaque_frame_without_source_alpha_is_jpeg() {
        let frame = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        assert!(!rgba_has_transparency(&frame));
    }
}
