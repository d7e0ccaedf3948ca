//! Source decoding: uniform frame streams over the `image` crate.
//!
//! [`FrameStream`] opens an image file, sniffs its format, and yields RGBA
//! frames one at a time. Animated containers (GIF, APNG, animated WebP) pull
//! lazily from the `image` crate's [`AnimationDecoder`] implementations;
//! every other format is a one-frame stream. Frames are decoded on demand so
//! the extraction loop can poll for cancellation between frames without
//! buffering the whole animation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, Frames, ImageDecoder, ImageFormat, ImageReader, RgbaImage};

use crate::error::ExtractError;
use crate::options::DecodeOptions;

/// One decoded frame: an RGBA buffer plus its display duration.
///
/// `duration` comes from the frame's own metadata and is `None` only for
/// static single-frame sources, which carry no timing information.
pub(crate) struct DecodedFrame {
    pub(crate) image: RgbaImage,
    pub(crate) duration: Option<Duration>,
}

enum StreamKind {
    /// Lazy frame iterator from an animation-capable decoder.
    Animated(Frames<'static>),
    /// A single decoded image, yielded once.
    Static(Option<DynamicImage>),
}

/// A pull-based stream of decoded frames from one source file.
///
/// Exclusively owned by one extraction call; dropping it releases the
/// underlying reader on every exit path.
pub(crate) struct FrameStream {
    kind: StreamKind,
    /// Whether the source file's pixel layout declares an alpha channel.
    ///
    /// GIF is always reported as `false` here: its decoded layout is RGBA
    /// regardless of palette transparency, so alpha presence for GIF is
    /// judged by scanning decoded pixels instead.
    source_alpha: bool,
    tolerate_truncation: bool,
    next_index: u64,
    ended: bool,
}

impl FrameStream {
    /// Open `path` and prepare a frame stream for it.
    ///
    /// # Errors
    ///
    /// [`ExtractError::FileOpen`] if the file cannot be read,
    /// [`ExtractError::UnsupportedFormat`] if its format cannot be
    /// recognised, or [`ExtractError::Image`] if the container header fails
    /// to parse.
    pub(crate) fn open(path: &Path, options: &DecodeOptions) -> Result<Self, ExtractError> {
        let format = sniff_format(path)?;
        log::debug!("Opening {} as {format:?}", path.display());

        let (kind, source_alpha) = match format {
            ImageFormat::Gif => {
                let decoder = GifDecoder::new(open_reader(path)?)?;
                (StreamKind::Animated(decoder.into_frames()), false)
            }
            ImageFormat::Png => {
                let decoder = PngDecoder::new(open_reader(path)?)?;
                let source_alpha = decoder.color_type().has_alpha();
                if decoder.is_apng()? {
                    (StreamKind::Animated(decoder.apng()?.into_frames()), source_alpha)
                } else {
                    let image = DynamicImage::from_decoder(decoder)?;
                    (StreamKind::Static(Some(image)), source_alpha)
                }
            }
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(open_reader(path)?)?;
                let source_alpha = decoder.color_type().has_alpha();
                if decoder.has_animation() {
                    (StreamKind::Animated(decoder.into_frames()), source_alpha)
                } else {
                    let image = DynamicImage::from_decoder(decoder)?;
                    (StreamKind::Static(Some(image)), source_alpha)
                }
            }
            _ => {
                // Any other recognised format is a single-frame source.
                let image = image::open(path)?;
                let source_alpha = image.color().has_alpha();
                (StreamKind::Static(Some(image)), source_alpha)
            }
        };

        Ok(Self {
            kind,
            source_alpha,
            tolerate_truncation: options.tolerate_truncation,
            next_index: 0,
            ended: false,
        })
    }

    /// Whether the source pixel layout declares an alpha channel.
    pub(crate) fn source_alpha(&self) -> bool {
        self.source_alpha
    }

    /// Decode the next frame, or `None` when the stream is exhausted.
    ///
    /// With [`DecodeOptions::tolerate_truncation`] set, a mid-stream decoder
    /// error ends the stream cleanly instead of surfacing.
    pub(crate) fn next_frame(&mut self) -> Option<Result<DecodedFrame, ExtractError>> {
        if self.ended {
            return None;
        }

        match &mut self.kind {
            StreamKind::Static(slot) => {
                let image = slot.take()?;
                self.ended = true;
                self.next_index += 1;
                Some(Ok(DecodedFrame {
                    image: image.into_rgba8(),
                    duration: None,
                }))
            }
            StreamKind::Animated(frames) => match frames.next() {
                None => {
                    self.ended = true;
                    None
                }
                Some(Ok(frame)) => {
                    let duration = Duration::from(frame.delay());
                    self.next_index += 1;
                    Some(Ok(DecodedFrame {
                        image: frame.into_buffer(),
                        duration: Some(duration),
                    }))
                }
                Some(Err(error)) => {
                    self.ended = true;
                    if self.tolerate_truncation {
                        log::warn!(
                            "Frame {} failed to decode, ending stream early: {error}",
                            self.next_index
                        );
                        None
                    } else {
                        Some(Err(ExtractError::FrameDecode {
                            frame_index: self.next_index,
                            reason: error.to_string(),
                        }))
                    }
                }
            },
        }
    }
}

/// Count the frames in `path` by draining a fresh stream.
///
/// Formats without multi-frame metadata count as 1.
pub(crate) fn count_frames(path: &Path, options: &DecodeOptions) -> Result<u64, ExtractError> {
    let mut stream = FrameStream::open(path, options)?;
    let mut count = 0;
    while let Some(frame) = stream.next_frame() {
        frame?;
        count += 1;
    }
    Ok(count)
}

fn open_reader(path: &Path) -> Result<BufReader<File>, ExtractError> {
    let file = File::open(path).map_err(|error| ExtractError::FileOpen {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    Ok(BufReader::new(file))
}

fn sniff_format(path: &Path) -> Result<ImageFormat, ExtractError> {
    let reader = ImageReader::open(path)
        .map_err(|error| ExtractError::FileOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?
        .with_guessed_format()
        .map_err(|error| ExtractError::FileOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
    reader.format().ok_or_else(|| ExtractError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}
