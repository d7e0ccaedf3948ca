//! # framecast
//!
//! Classify an image file and stream its frames — re-encoded and
//! base64-wrapped — to a host application through a callback sink.
//!
//! `framecast` answers three questions about an image and acts on them:
//! is it animated, does it need an alpha-preserving output format, and
//! what are its frames? Decoding and re-encoding are delegated to the
//! [`image`] crate; delivery is delegated to a host-provided [`FrameSink`].
//! There is no transport, no persistence, and no concurrency: one call, one
//! thread, frames in order.
//!
//! ## Quick Start
//!
//! ### Classify an image
//!
//! ```no_run
//! use framecast::{dominant_color, has_transparency, is_animated};
//!
//! let animated = is_animated("banner.gif")?;
//! let first = image::open("banner.gif")?;
//! let transparent = has_transparency(&first);
//! let accent = dominant_color(&first);
//! println!("animated={animated} transparent={transparent} accent={accent:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Stream frames to a host
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framecast::{ExtractError, FrameSink, extract_frames};
//!
//! struct StdoutHost;
//!
//! impl FrameSink for StdoutHost {
//!     fn report_info(&self, frame_count: u64, path: &Path) {
//!         eprintln!("{}: {frame_count} frame(s)", path.display());
//!     }
//!
//!     fn emit_frame(&self, payload: &str) {
//!         println!("{payload}");
//!     }
//! }
//!
//! let summary = extract_frames("banner.gif", &StdoutHost)?;
//! assert!(!summary.cancelled);
//! # Ok::<(), ExtractError>(())
//! ```
//!
//! ## Behaviour
//!
//! - **Animation detection** — a file with more than one frame is animated;
//!   formats without multi-frame metadata count as one frame.
//! - **Format choice** — made once per file: lossless WebP when the first
//!   frame carries transparency or the source layout declares an alpha
//!   channel, JPEG at fixed high quality otherwise.
//! - **Ordering** — frames are emitted in ascending index order with no
//!   gaps or duplicates; each payload carries the frame's own duration.
//! - **Cancellation** — the sink is polled before every frame decode; a stop
//!   is a clean early return, never an error.
//! - **Configuration** — truncated-input tolerance and JPEG quality are
//!   explicit per-call [`ExtractOptions`], not process-wide state.
//!
//! ## Payload format
//!
//! Each emitted frame is one string:
//!
//! ```text
//! <formatTag>?<path>?<durationMillis>?<base64Text>
//! ```
//!
//! with `formatTag` ∈ {`jpeg`, `webp`}. See [`FramePayload`].

pub mod analysis;
mod decode;
pub mod error;
pub mod extract;
pub mod options;
pub mod payload;
pub mod sink;

pub use analysis::{
    DEFAULT_PALETTE_SIZE, dominant_color, dominant_color_with, frame_count, frame_count_with,
    has_transparency, is_animated, is_animated_with,
};
pub use error::ExtractError;
pub use extract::{ExtractSummary, extract_frames, extract_frames_with};
pub use options::{DEFAULT_JPEG_QUALITY, DecodeOptions, ExtractOptions};
pub use payload::{FramePayload, OutputFormat};
pub use sink::FrameSink;
