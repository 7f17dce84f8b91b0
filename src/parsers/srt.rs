use log::{debug, warn};

use crate::document::{ParsedContent, SourceFormat, TextSegment, model::BLOCK_SEPARATOR};
use crate::errors::ParseError;
use crate::parsers::{DocumentParser, decode_utf8, normalize_line_endings};
use crate::timestamp;

/// SRT-style indexed subtitle blocks.
///
/// Malformed blocks are skipped rather than reported, so one damaged cue
/// never costs the rest of the file.
pub struct SrtParser;

impl DocumentParser for SrtParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::Srt
    }

    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError> {
        let text = normalize_line_endings(decode_utf8(raw)?);

        let mut segments = Vec::new();
        for (block_number, block) in Self::split_blocks(&text).iter().enumerate() {
            match Self::parse_block(block) {
                Some(segment) => segments.push(segment),
                None => debug!("Skipping malformed SRT block {}", block_number + 1),
            }
        }

        if segments.is_empty() && !text.trim().is_empty() {
            warn!("No valid subtitle blocks found in SRT content");
        }

        let full_text = segments
            .iter()
            .map(|segment| segment.content.as_str())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);

        Ok(ParsedContent::new(full_text, segments))
    }
}

impl SrtParser {
    /// Split on empty lines, then trim each block's lines and drop the blank ones.
    ///
    /// A whitespace-only line does not end a block.
    fn split_blocks(text: &str) -> Vec<Vec<&str>> {
        let mut blocks = Vec::new();
        let mut current = Vec::new();

        for line in text.lines() {
            if line.is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                continue;
            }

            let line = line.trim();
            if !line.is_empty() {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
    }

    // Index, timing line, then at least one line of text
    fn parse_block(lines: &[&str]) -> Option<TextSegment> {
        let [_index, timing, text @ ..] = lines else {
            return None;
        };
        if text.is_empty() {
            return None;
        }

        let (start_time, end_time) = timestamp::parse_range(timing)?;

        Some(TextSegment::timed(text.join(" "), start_time, end_time))
    }
}
