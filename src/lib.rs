/*!
 * # meetparse - Meeting artifact parsing
 *
 * A Rust library that normalizes meeting artifacts into one structured
 * representation for downstream summarization.
 *
 * ## Features
 *
 * - Parse meeting transcripts in several formats:
 *   - Plain text
 *   - WebVTT subtitles with `<v Speaker>` voice tags
 *   - SRT subtitles
 *   - JSON transcription exports (object and bare-array conventions)
 * - Extract per-page text from PDF presentations
 * - Table-driven parser selection from document kind and file extension
 * - Concurrent batch ingest with per-file failure isolation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `document`: `ParsedDocument` and `TextSegment` value types
 * - `timestamp`: subtitle timestamp normalization
 * - `speaker`: inline voice tag extraction
 * - `parsers`: one `DocumentParser` per source format
 * - `dispatcher`: routing from (kind, extension) to a parser
 * - `file_utils`: file system operations
 * - `app_controller`: batch ingest controller
 * - `app_config`: configuration management
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dispatcher;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod parsers;
pub mod speaker;
pub mod timestamp;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, IngestOutcome, IngestReport, IngestSummary};
pub use dispatcher::{Dispatcher, Route, RouteRule};
pub use document::{DocumentKind, ParsedDocument, SourceFormat, TextSegment};
pub use errors::{AppError, ParseError, ParseErrorKind};

/// Parse raw bytes with the built-in parsers.
///
/// `extension` is the original file extension and `kind` the caller's classification.
/// Unsupported (kind, extension) pairs fail with `ParseError::UnsupportedFormat`.
pub fn parse(
    raw: &[u8],
    extension: &str,
    kind: DocumentKind,
    source_file_name: &str,
) -> Result<ParsedDocument, ParseError> {
    dispatcher::DEFAULT_DISPATCHER.parse(raw, extension, kind, source_file_name)
}
