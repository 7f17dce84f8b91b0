/*!
 * Transcript JSON exports.
 *
 * Two conventions are accepted, tried in order:
 * 1. an object carrying the whole transcript in `text` (or `transcript`),
 *    optionally with a `segments` array;
 * 2. a bare array of segment objects.
 *
 * Segment fields are read leniently: a field of the wrong type counts as absent.
 */

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::document::{ParsedContent, SourceFormat, TextSegment, model::BLOCK_SEPARATOR};
use crate::errors::ParseError;
use crate::parsers::DocumentParser;

/// JSON transcription exports.
pub struct JsonTranscriptParser;

/// One element of a `segments` array or of a bare top-level array
#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default, deserialize_with = "lenient::string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    start: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    end: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    speaker: Option<String>,
}

impl From<RawSegment> for TextSegment {
    fn from(raw: RawSegment) -> Self {
        TextSegment::timed(raw.text.unwrap_or_default(), raw.start, raw.end).with_speaker(raw.speaker)
    }
}

/// Object shape: `{"text": "...", "segments": [...]}` or `{"transcript": "..."}`
#[derive(Debug, Deserialize)]
struct TranscriptEnvelope {
    #[serde(default, deserialize_with = "lenient::string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    transcript: Option<String>,
    #[serde(default, deserialize_with = "lenient::object_array")]
    segments: Option<Vec<RawSegment>>,
}

/// Recognized top-level shapes, in priority order
#[derive(Debug)]
enum TranscriptShape {
    Envelope {
        full_text: String,
        segments: Vec<RawSegment>,
    },
    SegmentArray(Vec<RawSegment>),
}

impl TranscriptShape {
    fn decode(value: Value) -> Result<Self, ParseError> {
        if value.is_object() {
            let envelope = TranscriptEnvelope::deserialize(&value)
                .map_err(|e| ParseError::InvalidFormat(format!("unreadable transcript object: {}", e)))?;

            if let Some(full_text) = envelope.text.or(envelope.transcript) {
                return Ok(Self::Envelope {
                    full_text,
                    segments: envelope.segments.unwrap_or_default(),
                });
            }
        } else if let Some(elements) = lenient::objects(&value) {
            let segments = elements
                .into_iter()
                .map(RawSegment::deserialize)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ParseError::InvalidFormat(format!("unreadable segment: {}", e)))?;
            return Ok(Self::SegmentArray(segments));
        }

        Err(ParseError::InvalidFormat(
            "expected an object with a 'text' or 'transcript' string, or an array of segment objects".to_string(),
        ))
    }

    fn into_content(self) -> ParsedContent {
        match self {
            Self::Envelope { full_text, segments } if segments.is_empty() => {
                debug!("JSON transcript has no segments, wrapping the whole text");
                ParsedContent::new(full_text.clone(), vec![TextSegment::text(full_text)])
            }
            Self::Envelope { full_text, segments } => {
                ParsedContent::new(full_text, segments.into_iter().map(TextSegment::from).collect())
            }
            Self::SegmentArray(segments) => {
                let segments: Vec<TextSegment> = segments.into_iter().map(TextSegment::from).collect();
                let full_text = segments
                    .iter()
                    .map(|segment| segment.content.as_str())
                    .collect::<Vec<_>>()
                    .join(BLOCK_SEPARATOR);
                ParsedContent::new(full_text, segments)
            }
        }
    }
}

impl DocumentParser for JsonTranscriptParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| ParseError::InvalidFormat(format!("not valid JSON: {}", e)))?;

        Ok(TranscriptShape::decode(value)?.into_content())
    }
}

/// Field deserializers that never fail on a type mismatch.
mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(str::to_string))
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_f64())
    }

    /// An array counts only when every element is an object
    pub fn object_array<'de, D>(deserializer: D) -> Result<Option<Vec<RawSegment>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Some(elements) = objects(&value) else {
            return Ok(None);
        };

        elements
            .into_iter()
            .map(|element| RawSegment::deserialize(element).map_err(<D::Error as serde::de::Error>::custom))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn objects(value: &Value) -> Option<Vec<&Value>> {
        let elements = value.as_array()?;
        if elements.iter().all(Value::is_object) {
            Some(elements.iter().collect())
        } else {
            None
        }
    }
}
