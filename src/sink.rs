//! The host-facing sink interface.
//!
//! Extraction does not talk to any concrete host: it reports through a
//! [`FrameSink`] implementation injected by the caller. The sink receives
//! one [`report_info`](FrameSink::report_info) call, is polled for
//! cancellation once per frame, and receives one
//! [`emit_frame`](FrameSink::emit_frame) call per produced frame.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framecast::{ExtractError, FrameSink, extract_frames};
//!
//! struct PrintSink;
//!
//! impl FrameSink for PrintSink {
//!     fn report_info(&self, frame_count: u64, path: &Path) {
//!         eprintln!("{}: {frame_count} frame(s)", path.display());
//!     }
//!
//!     fn emit_frame(&self, payload: &str) {
//!         println!("{payload}");
//!     }
//! }
//!
//! extract_frames("clip.gif", &PrintSink)?;
//! # Ok::<(), ExtractError>(())
//! ```

use std::path::Path;

/// Receiver for extraction results and source of the cancellation signal.
///
/// Extraction is synchronous and single-threaded: all methods are invoked
/// from the calling thread, in order, and no call outlives the extraction
/// call that made it.
pub trait FrameSink {
    /// Called exactly once per extraction, before any frame is emitted,
    /// with the total frame count and the source path.
    fn report_info(&self, frame_count: u64, path: &Path);

    /// Polled once per frame, before that frame is decoded. Returning
    /// `true` halts extraction immediately: the current frame and all later
    /// ones are never produced.
    ///
    /// The signal is re-evaluated on every iteration, never cached, so a
    /// host may request a stop at any frame boundary. Defaults to `false`.
    fn stop_requested(&self, path: &Path) -> bool {
        let _ = path;
        false
    }

    /// Called once per successfully produced frame with the payload in wire
    /// form (see [`FramePayload`](crate::FramePayload)). Frames arrive in
    /// ascending index order with no gaps.
    fn emit_frame(&self, payload: &str);
}
