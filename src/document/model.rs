/*!
 * Core value types produced by the parsing subsystem.
 *
 * These types are immutable after construction and serialize to JSON
 * (camelCase keys) for downstream collaborators.
 */

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Separator between cue, block and JSON element contributions
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Separator between PDF pages
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Coarse classification of a document, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Transcript,
    Presentation,
    Audio,
}

impl DocumentKind {
    /// Classify a lower-cased file extension, as the upstream import layer does.
    ///
    /// Returns `None` for extensions this system does not know about.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "txt" | "vtt" | "srt" | "json" => Some(Self::Transcript),
            "m4a" | "mp3" | "wav" => Some(Self::Audio),
            "pdf" | "pptx" | "key" => Some(Self::Presentation),
            _ => None,
        }
    }

    /// Every extension with a known classification
    pub fn known_extensions() -> &'static [&'static str] {
        &["txt", "vtt", "srt", "json", "m4a", "mp3", "wav", "pdf", "pptx", "key"]
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transcript => write!(f, "transcript"),
            Self::Presentation => write!(f, "presentation"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "transcript" => Ok(Self::Transcript),
            "presentation" => Ok(Self::Presentation),
            "audio" => Ok(Self::Audio),
            _ => Err(anyhow::anyhow!("Invalid document kind: {}", s)),
        }
    }
}

/// Which parser produced a document. Determines the `full_text` join rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    PlainText,
    WebVtt,
    Srt,
    Json,
    Pdf,
    /// Stand-in document for a route the dispatcher does not support
    Placeholder,
}

impl SourceFormat {
    /// Short identifier used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlainText => "plaintext",
            Self::WebVtt => "webvtt",
            Self::Srt => "srt",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Placeholder => "placeholder",
        }
    }

    /// Rebuild `full_text` from segments using this format's join rule.
    ///
    /// WebVTT prefixes each contribution with its speaker. For the JSON object
    /// shape the top-level text is authoritative, so this only matches when the
    /// document fell back to a single wrapping segment.
    pub fn reassemble(&self, segments: &[TextSegment]) -> String {
        match self {
            Self::PlainText | Self::Placeholder => segments
                .iter()
                .map(|segment| segment.content.as_str())
                .collect::<Vec<_>>()
                .concat(),
            Self::WebVtt => segments
                .iter()
                .map(TextSegment::attributed_content)
                .collect::<Vec<_>>()
                .join(BLOCK_SEPARATOR),
            Self::Srt | Self::Json => segments
                .iter()
                .map(|segment| segment.content.as_str())
                .collect::<Vec<_>>()
                .join(BLOCK_SEPARATOR),
            Self::Pdf => segments
                .iter()
                .map(|segment| segment.content.as_str())
                .collect::<Vec<_>>()
                .join(PAGE_SEPARATOR),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A normalized unit of parsed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    /// Speaker- and timestamp-stripped text
    pub content: String,

    /// Seconds from the start of the recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    /// Speaker name, only when the source encodes one for this segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl TextSegment {
    /// Segment with no timing or speaker metadata
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            start_time: None,
            end_time: None,
            speaker: None,
        }
    }

    /// Segment with a time range
    pub fn timed(content: impl Into<String>, start_time: Option<f64>, end_time: Option<f64>) -> Self {
        Self {
            content: content.into(),
            start_time,
            end_time,
            speaker: None,
        }
    }

    pub fn with_speaker(mut self, speaker: Option<String>) -> Self {
        self.speaker = speaker;
        self
    }

    /// Content prefixed with `"<speaker>: "` when a speaker is known
    pub fn attributed_content(&self) -> String {
        match &self.speaker {
            Some(speaker) => format!("{}: {}", speaker, self.content),
            None => self.content.clone(),
        }
    }

    /// Length of the time range, when both ends are known
    pub fn duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// What a format parser returns before the dispatcher stamps identity onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedContent {
    pub full_text: String,
    pub segments: Vec<TextSegment>,
}

impl ParsedContent {
    pub fn new(full_text: String, segments: Vec<TextSegment>) -> Self {
        Self { full_text, segments }
    }
}

/// Complete normalized representation of one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Generated at parse time
    pub id: Uuid,

    /// Base name of the original file, for display only
    pub source_file_name: String,

    /// Caller's classification, never re-derived by parsers
    pub document_kind: DocumentKind,

    /// Parser that produced this document
    pub source_format: SourceFormat,

    pub full_text: String,

    /// Document order
    pub segments: Vec<TextSegment>,

    /// Hex SHA-256 of the raw input bytes
    pub source_digest: String,

    /// Parse completion time
    pub parsed_at: DateTime<Utc>,
}

impl ParsedDocument {
    /// Wrap parser output with a fresh identity and completion timestamp.
    pub fn from_content(
        content: ParsedContent,
        source_file_name: &str,
        document_kind: DocumentKind,
        source_format: SourceFormat,
        raw: &[u8],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_file_name: source_file_name.to_string(),
            document_kind,
            source_format,
            full_text: content.full_text,
            segments: content.segments,
            source_digest: digest_hex(raw),
            parsed_at: Utc::now(),
        }
    }

    /// Stand-in document for a file whose (kind, extension) route has no parser.
    pub fn placeholder(source_file_name: &str, document_kind: DocumentKind, extension: &str, raw: &[u8]) -> Self {
        let message = match document_kind {
            DocumentKind::Audio => format!(
                "[Audio file '{}': transcription is not yet supported]",
                source_file_name
            ),
            _ => format!(
                "[{} file '{}' ({}): content extraction is not yet supported]",
                capitalize(&document_kind.to_string()),
                source_file_name,
                extension
            ),
        };

        Self::from_content(
            ParsedContent::new(message.clone(), vec![TextSegment::text(message)]),
            source_file_name,
            document_kind,
            SourceFormat::Placeholder,
            raw,
        )
    }

    /// Rebuild `full_text` from `segments` with the source format's join rule
    pub fn reassembled_text(&self) -> String {
        self.source_format.reassemble(&self.segments)
    }

    /// Distinct speakers in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for speaker in self.segments.iter().filter_map(|s| s.speaker.as_deref()) {
            if !speakers.contains(&speaker) {
                speakers.push(speaker);
            }
        }
        speakers
    }

    /// Latest known segment end time
    pub fn duration(&self) -> Option<f64> {
        self.segments
            .iter()
            .filter_map(|segment| segment.end_time)
            .fold(None, |latest, end| match latest {
                Some(current) if current >= end => Some(current),
                _ => Some(end),
            })
    }

    pub fn is_placeholder(&self) -> bool {
        self.source_format == SourceFormat::Placeholder
    }
}

fn digest_hex(raw: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    format!("{:x}", hasher.finalize())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
