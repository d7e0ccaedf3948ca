//! Error types for the `framecast` crate.
//!
//! This module defines [`ExtractError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem at the call site, including file paths and frame indices.
//!
//! Cancellation is deliberately absent from this enum: a host stopping an
//! extraction mid-stream is a clean early termination, reported through
//! [`ExtractSummary::cancelled`](crate::ExtractSummary), never as an error.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framecast` operations.
///
/// Every public method that can fail returns `Result<T, ExtractError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The image file could not be opened.
    #[error("Failed to open image file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the extraction entry point.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file's image format could not be recognised.
    #[error("Unrecognised image format: {path}")]
    UnsupportedFormat {
        /// Path to the offending file.
        path: PathBuf,
    },

    /// A frame could not be decoded from the source.
    #[error("Failed to decode frame {frame_index}: {reason}")]
    FrameDecode {
        /// Zero-based index of the frame that failed.
        frame_index: u64,
        /// Underlying decoder error message.
        reason: String,
    },

    /// An animated image's frame carries no duration metadata.
    #[error("Frame {frame_index} of an animated image has no duration")]
    MissingFrameDuration {
        /// Zero-based index of the frame missing its duration.
        frame_index: u64,
    },

    /// A frame could not be re-encoded to the chosen output format.
    #[error("Failed to encode frame {frame_index}: {reason}")]
    FrameEncode {
        /// Zero-based index of the frame that failed.
        frame_index: u64,
        /// Underlying encoder error message.
        reason: String,
    },

    /// An error from the `image` crate while parsing or converting.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// An I/O error occurred while reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
