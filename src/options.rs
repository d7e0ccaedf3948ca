//! Decoding and extraction configuration.
//!
//! The original integration this crate replaces configured its imaging
//! library through process-wide flags. Here those knobs are explicit,
//! per-call values: [`DecodeOptions`] controls how a source file is read and
//! [`ExtractOptions`] additionally carries re-encoding settings for
//! [`extract_frames_with`](crate::extract_frames_with).
//!
//! # Example
//!
//! ```
//! use framecast::{DecodeOptions, ExtractOptions};
//!
//! let options = ExtractOptions::new()
//!     .with_jpeg_quality(85)
//!     .with_decode(DecodeOptions::new().with_tolerate_truncation(true));
//! assert_eq!(options.jpeg_quality, 85);
//! ```

/// JPEG quality used when no explicit value is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Options controlling how a source image file is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct DecodeOptions {
    /// When `true`, a frame stream that fails mid-file ends cleanly at the
    /// last successfully decoded frame instead of returning an error.
    ///
    /// Defaults to `false`: a corrupt frame is a
    /// [`FrameDecode`](crate::ExtractError::FrameDecode) error.
    pub tolerate_truncation: bool,
}

impl DecodeOptions {
    /// Create decode options with default settings (strict decoding).
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate truncated input, ending the frame stream at the last good
    /// frame rather than erroring.
    pub fn with_tolerate_truncation(mut self, tolerate: bool) -> Self {
        self.tolerate_truncation = tolerate;
        self
    }
}

/// Options for a full frame-extraction run.
///
/// Passed to [`extract_frames_with`](crate::extract_frames_with). A
/// default-constructed value matches the plain
/// [`extract_frames`](crate::extract_frames) behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ExtractOptions {
    /// How the source file is decoded.
    pub decode: DecodeOptions,
    /// Quality for JPEG re-encoding, 1–100. Defaults to
    /// [`DEFAULT_JPEG_QUALITY`]. WebP output is lossless and ignores this.
    pub jpeg_quality: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create extraction options with default settings.
    ///
    /// Defaults: strict decoding, JPEG quality [`DEFAULT_JPEG_QUALITY`].
    pub fn new() -> Self {
        Self {
            decode: DecodeOptions::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the decode options.
    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Set the JPEG re-encoding quality. Clamped to 1–100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}
