/*!
 * Format parsers.
 *
 * Each parser turns raw bytes into `ParsedContent` for exactly one source format.
 * Parsers hold no state between calls and are safe to share across threads.
 */

pub mod json;
pub mod pdf;
pub mod plain;
pub mod srt;
pub mod webvtt;

pub use json::JsonTranscriptParser;
pub use pdf::{LopdfExtractor, PageTextExtractor, PdfParser};
pub use plain::PlainTextParser;
pub use srt::SrtParser;
pub use webvtt::WebVttParser;

use crate::document::{ParsedContent, SourceFormat};
use crate::errors::ParseError;

/// Common contract of all format parsers.
pub trait DocumentParser: Send + Sync {
    /// Format this parser understands
    fn format(&self) -> SourceFormat;

    /// Parse the complete raw input of one file
    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError>;
}

/// Decode bytes as UTF-8 text.
pub(crate) fn decode_utf8(raw: &[u8]) -> Result<&str, ParseError> {
    Ok(std::str::from_utf8(raw)?)
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
