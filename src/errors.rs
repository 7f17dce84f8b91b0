/*!
 * Error types for the meetparse library.
 *
 * `ParseError` is the uniform failure taxonomy shared by every format parser.
 * `AppError` covers the batch application around it (configuration and input
 * enumeration). Per-file failures stay `ParseError`s inside the batch report.
 */

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a parse failure, stable across parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    UnreadableFile,
    InvalidFormat,
    UnableToLoad,
    NoExtractableContent,
    UnsupportedFormat,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnreadableFile => "unreadable_file",
            Self::InvalidFormat => "invalid_format",
            Self::UnableToLoad => "unable_to_load",
            Self::NoExtractableContent => "no_extractable_content",
            Self::UnsupportedFormat => "unsupported_format",
        };
        write!(f, "{}", name)
    }
}

/// Errors that can occur while turning raw bytes into a `ParsedDocument`
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ParseError {
    /// The bytes could not be obtained or are not valid UTF-8
    #[error("Unreadable file: {0}")]
    UnreadableFile(String),

    /// The content was readable but does not match the expected grammar
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The PDF document could not be opened at all
    #[error("Unable to load PDF: {0}")]
    UnableToLoad(String),

    /// The PDF opened but no page carries extractable text
    #[error("No extractable content: {0}")]
    NoExtractableContent(String),

    /// The format is acknowledged but not implemented
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl ParseError {
    /// Kind of this failure, without the message
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::UnreadableFile(_) => ParseErrorKind::UnreadableFile,
            Self::InvalidFormat(_) => ParseErrorKind::InvalidFormat,
            Self::UnableToLoad(_) => ParseErrorKind::UnableToLoad,
            Self::NoExtractableContent(_) => ParseErrorKind::NoExtractableContent,
            Self::UnsupportedFormat(_) => ParseErrorKind::UnsupportedFormat,
        }
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::UnreadableFile(format!("content is not valid UTF-8: {}", error))
    }
}

impl From<std::string::FromUtf8Error> for ParseError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::UnreadableFile(format!("content is not valid UTF-8: {}", error))
    }
}

/// Errors raised by the batch application around the parsing core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Inputs could not be enumerated
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
