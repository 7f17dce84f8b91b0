use anyhow::{Context, Result};
use log::{debug, warn};
use lopdf::Document;

use crate::document::{ParsedContent, SourceFormat, TextSegment, model::PAGE_SEPARATOR};
use crate::errors::ParseError;
use crate::parsers::DocumentParser;

/// Source of per-page plain text for a PDF document.
pub trait PageTextExtractor: Send + Sync {
    /// Text of every page in document order.
    ///
    /// An error means the document could not be opened at all.
    fn page_texts(&self, raw: &[u8]) -> Result<Vec<String>>;
}

/// Page text extraction backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PageTextExtractor for LopdfExtractor {
    fn page_texts(&self, raw: &[u8]) -> Result<Vec<String>> {
        let document = Document::load_mem(raw).context("Failed to open PDF document")?;

        let pages = document.get_pages();
        debug!("PDF document has {} page(s)", pages.len());

        let texts = pages
            .keys()
            .map(|&page_number| {
                document.extract_text(&[page_number]).unwrap_or_else(|e| {
                    // Unreadable pages count as empty
                    warn!("Failed to extract text from PDF page {}: {}", page_number, e);
                    String::new()
                })
            })
            .collect();

        Ok(texts)
    }
}

/// PDF decks and documents: one segment per non-empty page.
pub struct PdfParser<E: PageTextExtractor = LopdfExtractor> {
    extractor: E,
}

impl PdfParser<LopdfExtractor> {
    pub fn new() -> Self {
        Self::with_extractor(LopdfExtractor)
    }
}

impl Default for PdfParser<LopdfExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PageTextExtractor> PdfParser<E> {
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }
}

impl<E: PageTextExtractor> DocumentParser for PdfParser<E> {
    fn format(&self) -> SourceFormat {
        SourceFormat::Pdf
    }

    fn parse(&self, raw: &[u8]) -> Result<ParsedContent, ParseError> {
        let pages = self
            .extractor
            .page_texts(raw)
            .map_err(|e| ParseError::UnableToLoad(format!("{:#}", e)))?;
        let page_count = pages.len();

        let segments: Vec<TextSegment> = pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .map(|page| TextSegment::text(page))
            .collect();

        if segments.is_empty() {
            return Err(ParseError::NoExtractableContent(format!(
                "none of {} page(s) contain text",
                page_count
            )));
        }

        let full_text = segments
            .iter()
            .map(|segment| segment.content.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);

        Ok(ParsedContent::new(full_text, segments))
    }
}
