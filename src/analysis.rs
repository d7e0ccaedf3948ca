//! Image classification: animation, transparency, dominant colour.
//!
//! These operations are independent of one another and of
//! [`extract_frames`](crate::extract_frames): a host can ask whether a file
//! is animated without paying for extraction, and dominant-colour sampling
//! never piggybacks on the animation check.

use std::path::Path;

use color_quant::NeuQuant;
use image::{DynamicImage, Rgb};

use crate::decode::{self, FrameStream};
use crate::error::ExtractError;
use crate::options::DecodeOptions;

/// Palette size used by [`dominant_color`].
pub const DEFAULT_PALETTE_SIZE: usize = 16;

/// Largest edge of the thumbnail sampled for dominant-colour analysis.
const DOMINANT_SAMPLE_EDGE: u32 = 100;

/// Returns `true` iff the image at `path` has more than one frame.
///
/// Formats that expose no multi-frame metadata count as a single frame.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed.
///
/// # Example
///
/// ```no_run
/// use framecast::is_animated;
///
/// if is_animated("banner.gif")? {
///     println!("multi-frame");
/// }
/// # Ok::<(), framecast::ExtractError>(())
/// ```
pub fn is_animated<P: AsRef<Path>>(path: P) -> Result<bool, ExtractError> {
    is_animated_with(path, &DecodeOptions::default())
}

/// Like [`is_animated`], with explicit decode options.
pub fn is_animated_with<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<bool, ExtractError> {
    let mut stream = FrameStream::open(path.as_ref(), options)?;
    // Pull at most two frames; the second one decides.
    match stream.next_frame() {
        None => return Ok(false),
        Some(frame) => {
            frame?;
        }
    }
    match stream.next_frame() {
        None => Ok(false),
        Some(frame) => {
            frame?;
            Ok(true)
        }
    }
}

/// Count the frames in the image at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed, or (without
/// [`DecodeOptions::tolerate_truncation`]) if a frame fails to decode.
pub fn frame_count<P: AsRef<Path>>(path: P) -> Result<u64, ExtractError> {
    frame_count_with(path, &DecodeOptions::default())
}

/// Like [`frame_count`], with explicit decode options.
pub fn frame_count_with<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<u64, ExtractError> {
    decode::count_frames(path.as_ref(), options)
}

/// Returns `true` iff the decoded image contains any sub-opaque pixel.
///
/// Palette transparency and explicit transparency markers are materialised
/// by the decoders as alpha values below fully opaque, so this single scan
/// covers indexed, greyscale-alpha, and true-alpha sources alike. An image
/// without an alpha component is never transparent.
pub fn has_transparency(image: &DynamicImage) -> bool {
    if !image.color().has_alpha() {
        return false;
    }
    match image {
        DynamicImage::ImageLumaA8(buffer) => buffer.pixels().any(|p| p.0[1] < u8::MAX),
        DynamicImage::ImageRgba8(buffer) => buffer.pixels().any(|p| p.0[3] < u8::MAX),
        DynamicImage::ImageLumaA16(buffer) => buffer.pixels().any(|p| p.0[1] < u16::MAX),
        DynamicImage::ImageRgba16(buffer) => buffer.pixels().any(|p| p.0[3] < u16::MAX),
        DynamicImage::ImageRgba32F(buffer) => buffer.pixels().any(|p| p.0[3] < 1.0),
        _ => false,
    }
}

/// The most frequent colour of `image` after adaptive palette reduction.
///
/// Samples a thumbnail of at most 100×100 pixels, quantises it to a
/// [`DEFAULT_PALETTE_SIZE`]-colour adaptive palette, and returns the palette
/// entry the most pixels map to. A zero-sized image yields black.
pub fn dominant_color(image: &DynamicImage) -> Rgb<u8> {
    dominant_color_with(image, DEFAULT_PALETTE_SIZE)
}

/// Like [`dominant_color`], with an explicit palette size (clamped to
/// 2–256).
pub fn dominant_color_with(image: &DynamicImage, palette_size: usize) -> Rgb<u8> {
    let palette_size = palette_size.clamp(2, 256);
    let thumbnail = image.thumbnail(DOMINANT_SAMPLE_EDGE, DOMINANT_SAMPLE_EDGE);
    let rgba = thumbnail.to_rgba8();
    if rgba.as_raw().is_empty() {
        return Rgb([0, 0, 0]);
    }

    let quantizer = NeuQuant::new(10, palette_size, rgba.as_raw());

    let mut counts = vec![0u32; palette_size];
    for pixel in rgba.pixels() {
        let index = quantizer.index_of(&pixel.0);
        if let Some(count) = counts.get_mut(index) {
            *count += 1;
        }
    }

    let winner = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)
        .map(|(index, _)| index)
        .unwrap_or(0);

    let palette = quantizer.color_map_rgba();
    let base = winner * 4;
    Rgb([palette[base], palette[base + 1], palette[base + 2]])
}
