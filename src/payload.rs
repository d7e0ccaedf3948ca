//! Frame payload wire format.
//!
//! Each produced frame is handed to the host as a single string of the form
//!
//! ```text
//! <formatTag>?<path>?<durationMillis>?<base64Text>
//! ```
//!
//! where `formatTag` is `jpeg` or `webp` and `base64Text` is the standard
//! base64 encoding of the re-encoded frame bytes, with no surrounding
//! quotes. [`FramePayload`] builds and parses that form.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Output format a frame is re-encoded to before emission.
///
/// The format is chosen once per source file: alpha-capable lossless WebP
/// when transparency must be preserved, JPEG otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Opaque JPEG at fixed high quality.
    Jpeg,
    /// Lossless WebP, preserving the alpha channel.
    Webp,
}

impl OutputFormat {
    /// The wire tag for this format.
    pub fn tag(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }

    /// Parse a wire tag back into a format.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.tag())
    }
}

/// One frame's worth of data, ready to hand to the host.
///
/// Transient: constructed per frame, rendered with [`Display`] and passed to
/// [`FrameSink::emit_frame`](crate::FrameSink::emit_frame), not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePayload {
    /// Format the frame bytes are encoded in.
    pub format: OutputFormat,
    /// Source path, as given to the extraction call.
    pub path: String,
    /// Frame display duration in milliseconds. 0 for a static image.
    pub duration_millis: u64,
    /// Base64 text of the encoded frame bytes.
    pub base64: String,
}

impl FramePayload {
    /// Build a payload from raw encoded frame bytes, base64-wrapping them.
    pub fn from_encoded_bytes(
        format: OutputFormat,
        path: &Path,
        duration_millis: u64,
        bytes: &[u8],
    ) -> Self {
        Self {
            format,
            path: path.display().to_string(),
            duration_millis,
            base64: STANDARD.encode(bytes),
        }
    }

    /// Parse a wire-form payload string.
    ///
    /// Returns `None` if the string does not split into exactly four
    /// `?`-separated fields with a known format tag and numeric duration.
    /// The base64 text is kept verbatim; use [`decode_bytes`](Self::decode_bytes)
    /// to recover the frame bytes.
    pub fn parse(payload: &str) -> Option<Self> {
        let mut fields = payload.splitn(4, '?');
        let format = OutputFormat::from_tag(fields.next()?)?;
        let path = fields.next()?.to_string();
        let duration_millis = fields.next()?.parse().ok()?;
        let base64 = fields.next()?.to_string();
        Some(Self {
            format,
            path,
            duration_millis,
            base64,
        })
    }

    /// Decode the base64 text back into the encoded frame bytes.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.base64).ok()
    }
}

impl Display for FramePayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}?{}?{}?{}",
            self.format, self.path, self.duration_millis, self.base64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trip() {
        let payload = FramePayload::from_encoded_bytes(
            OutputFormat::Jpeg,
            Path::new("clip.gif"),
            100,
            b"hello",
        );
        let wire = payload.to_string();
        assert_eq!(wire.split('?').count(), 4);
        assert!(wire.starts_with("jpeg?clip.gif?100?"));

        let parsed = FramePayload::parse(&wire).expect("payload should parse");
        assert_eq!(parsed, payload);
        assert_eq!(parsed.decode_bytes().as_deref(), Some(&b"hello"[..]));
    }

    #[test]
    fn base64_text_has_no_quotes() {
        let payload = FramePayload::from_encoded_bytes(
            OutputFormat::Webp,
            Path::new("a.webp"),
            0,
            &[0xff, 0x00, 0x7f],
        );
        assert!(!payload.base64.contains('\''));
        assert!(!payload.base64.contains('"'));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert!(FramePayload::parse("png?a?0?AA==").is_none());
        assert!(OutputFormat::from_tag("jpeg").is_some());
        assert!(OutputFormat::from_tag("webp").is_some());
        assert!(OutputFormat::from_tag("gif").is_none());
    }

    #[test]
    fn malformed_payload_rejected() {
        assert!(FramePayload::parse("jpeg?only-three?100").is_none());
        assert!(FramePayload::parse("jpeg?a?not-a-number?AA==").is_none());
    }
}
