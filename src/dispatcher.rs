/*!
 * Parser selection.
 *
 * A routing table maps (document kind, file extension) to a source format, and a
 * registry maps each source format to its parser. Supporting a new format means
 * registering a parser and adding a route; no parser changes.
 */

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;

use crate::document::{DocumentKind, ParsedDocument, SourceFormat};
use crate::errors::ParseError;
use crate::parsers::{DocumentParser, JsonTranscriptParser, PdfParser, PlainTextParser, SrtParser, WebVttParser};

/// Shared dispatcher with every built-in parser and route
pub static DEFAULT_DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::default);

/// Outcome of routing a (kind, extension) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Parse with the parser registered for this format
    Parse(SourceFormat),
    /// Known capability gap: the caller substitutes a placeholder document
    Unsupported,
}

/// One row of the routing table. `extension: None` matches any extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub kind: DocumentKind,
    pub extension: Option<&'static str>,
    pub route: Route,
}

impl RouteRule {
    pub const fn exact(kind: DocumentKind, extension: &'static str, route: Route) -> Self {
        Self {
            kind,
            extension: Some(extension),
            route,
        }
    }

    pub const fn fallback(kind: DocumentKind, route: Route) -> Self {
        Self {
            kind,
            extension: None,
            route,
        }
    }

    fn matches(&self, kind: DocumentKind, extension: &str) -> bool {
        self.kind == kind && self.extension.is_none_or(|expected| expected == extension)
    }
}

/// Built-in routes, most specific first
pub const DEFAULT_ROUTES: &[RouteRule] = &[
    RouteRule::exact(DocumentKind::Transcript, "vtt", Route::Parse(SourceFormat::WebVtt)),
    RouteRule::exact(DocumentKind::Transcript, "srt", Route::Parse(SourceFormat::Srt)),
    RouteRule::exact(DocumentKind::Transcript, "json", Route::Parse(SourceFormat::Json)),
    RouteRule::fallback(DocumentKind::Transcript, Route::Parse(SourceFormat::PlainText)),
    RouteRule::exact(DocumentKind::Presentation, "pdf", Route::Parse(SourceFormat::Pdf)),
    RouteRule::fallback(DocumentKind::Presentation, Route::Unsupported),
    RouteRule::fallback(DocumentKind::Audio, Route::Unsupported),
];

/// Routes raw input to the right format parser.
pub struct Dispatcher {
    routes: Vec<RouteRule>,
    parsers: HashMap<SourceFormat, Box<dyn DocumentParser>>,
}

impl Dispatcher {
    /// Dispatcher with no routes and no parsers
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            parsers: HashMap::new(),
        }
    }

    /// Register a parser under the format it reports
    pub fn register_parser(&mut self, parser: Box<dyn DocumentParser>) {
        self.parsers.insert(parser.format(), parser);
    }

    /// Add a route that takes precedence over existing ones
    pub fn add_route(&mut self, rule: RouteRule) {
        self.routes.insert(0, rule);
    }

    /// Formats with a registered parser
    pub fn registered_formats(&self) -> Vec<SourceFormat> {
        self.parsers.keys().copied().collect()
    }

    /// Look up the route for a document kind and file extension.
    ///
    /// The extension is matched case-insensitively, with or without a leading dot.
    /// Pairs no rule covers are unsupported.
    pub fn route(&self, kind: DocumentKind, extension: &str) -> Route {
        let extension = normalize_extension(extension);
        self.routes
            .iter()
            .find(|rule| rule.matches(kind, &extension))
            .map(|rule| rule.route)
            .unwrap_or(Route::Unsupported)
    }

    /// Parse raw bytes into a document.
    ///
    /// Unsupported routes fail with `ParseError::UnsupportedFormat`; callers that want
    /// the placeholder policy use `parse_or_placeholder`.
    pub fn parse(
        &self,
        raw: &[u8],
        extension: &str,
        kind: DocumentKind,
        source_file_name: &str,
    ) -> Result<ParsedDocument, ParseError> {
        let format = match self.route(kind, extension) {
            Route::Parse(format) => format,
            Route::Unsupported => {
                return Err(ParseError::UnsupportedFormat(format!(
                    "{} files with extension '{}' are not supported",
                    kind,
                    normalize_extension(extension)
                )));
            }
        };

        let parser = self.parsers.get(&format).ok_or_else(|| {
            ParseError::UnsupportedFormat(format!("no parser registered for {}", format))
        })?;

        debug!("Parsing {} ({} bytes) as {}", source_file_name, raw.len(), format);
        let content = parser.parse(raw)?;

        Ok(ParsedDocument::from_content(content, source_file_name, kind, format, raw))
    }

    /// Parse, substituting a placeholder document for unsupported routes.
    pub fn parse_or_placeholder(
        &self,
        raw: &[u8],
        extension: &str,
        kind: DocumentKind,
        source_file_name: &str,
    ) -> Result<ParsedDocument, ParseError> {
        match self.route(kind, extension) {
            Route::Unsupported => Ok(ParsedDocument::placeholder(
                source_file_name,
                kind,
                &normalize_extension(extension),
                raw,
            )),
            Route::Parse(_) => self.parse(raw, extension, kind, source_file_name),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.routes = DEFAULT_ROUTES.to_vec();
        dispatcher.register_parser(Box::new(PlainTextParser));
        dispatcher.register_parser(Box::new(WebVttParser));
        dispatcher.register_parser(Box::new(SrtParser));
        dispatcher.register_parser(Box::new(JsonTranscriptParser));
        dispatcher.register_parser(Box::new(PdfParser::new()));
        dispatcher
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
