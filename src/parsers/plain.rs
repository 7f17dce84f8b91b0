use crate::document::{ParsedContent, SourceFormat, TextSegment};
use crate::errors::ParseError;
use crate::parsers::{DocumentParser, decode_utf8};

/// Plain text: the whole file is one segment, kept verbatim.
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::PlainText
    }

    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError> {
        let text = decode_utf8(raw)?;

        Ok(ParsedContent::new(text.to_string(), vec![TextSegment::text(text)]))
    }
}
