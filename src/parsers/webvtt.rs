use std::iter::Peekable;
use std::str::Lines;

use log::debug;

use crate::document::{ParsedContent, SourceFormat, TextSegment, model::BLOCK_SEPARATOR};
use crate::errors::ParseError;
use crate::parsers::{DocumentParser, decode_utf8, normalize_line_endings};
use crate::{speaker, timestamp};

/// Mandatory first token of a WebVTT file
pub const WEBVTT_HEADER: &str = "WEBVTT";

// Blocks that may sit between cues and never carry cue text
const NON_CUE_BLOCKS: [&str; 3] = ["NOTE", "STYLE", "REGION"];

/// WebVTT-style cue blocks with optional `<v Speaker>` voice tags.
pub struct WebVttParser;

/// One cue as read from the file, before it becomes a segment
#[derive(Debug, Default)]
struct CueBuilder {
    start_time: Option<f64>,
    end_time: Option<f64>,
    speaker: Option<String>,
    parts: Vec<String>,
}

impl CueBuilder {
    fn new(start_time: Option<f64>, end_time: Option<f64>) -> Self {
        Self {
            start_time,
            end_time,
            ..Self::default()
        }
    }

    fn push_line(&mut self, line: &str) {
        let text = match speaker::extract(line) {
            Some((name, utterance)) => {
                // The first voice tag in a cue names its speaker
                if self.speaker.is_none() {
                    self.speaker = Some(name);
                }
                utterance
            }
            None => line.trim().to_string(),
        };

        if !text.is_empty() {
            self.parts.push(text);
        }
    }

    fn build(self) -> Option<TextSegment> {
        let content = self.parts.join(" ").trim().to_string();
        if content.is_empty() {
            return None;
        }

        Some(TextSegment::timed(content, self.start_time, self.end_time).with_speaker(self.speaker))
    }
}

impl DocumentParser for WebVttParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::WebVtt
    }

    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError> {
        let text = normalize_line_endings(decode_utf8(raw)?);
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);

        if !text.starts_with(WEBVTT_HEADER) {
            return Err(ParseError::InvalidFormat(format!(
                "missing {} header",
                WEBVTT_HEADER
            )));
        }

        let mut lines = text.lines().peekable();
        let mut segments = Vec::new();
        let mut skipped = 0usize;

        while let Some(line) = lines.next() {
            if Self::opens_non_cue_block(line) {
                Self::skip_block(&mut lines);
                continue;
            }

            // Lines outside a cue (blank lines, cue identifiers) carry nothing
            let Some((start_time, end_time)) = timestamp::parse_range(line) else {
                continue;
            };

            let mut cue = CueBuilder::new(start_time, end_time);
            while let Some(body_line) = lines.next_if(|next| Self::is_cue_body(next)) {
                cue.push_line(body_line);
            }

            match cue.build() {
                Some(segment) => segments.push(segment),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} empty WebVTT cue(s)", skipped);
        }

        let full_text = segments
            .iter()
            .map(TextSegment::attributed_content)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);

        Ok(ParsedContent::new(full_text, segments))
    }
}

impl WebVttParser {
    // A cue body runs until a blank line or the next timing line
    fn is_cue_body(line: &str) -> bool {
        !line.trim().is_empty() && !line.contains(timestamp::CUE_RANGE_DELIMITER)
    }

    fn opens_non_cue_block(line: &str) -> bool {
        line.split_whitespace()
            .next()
            .is_some_and(|keyword| NON_CUE_BLOCKS.contains(&keyword))
    }

    fn skip_block(lines: &mut Peekable<Lines<'_>>) {
        while lines.next_if(|line| !line.trim().is_empty()).is_some() {}
    }
}
