/*!
 * Document model for parsed meeting artifacts.
 *
 * Every format parser produces the same value types:
 * - `ParsedDocument`: one normalized document per successful parse
 * - `TextSegment`: one cue, block, JSON element, PDF page or whole text file
 * - `DocumentKind` / `SourceFormat`: caller classification and producing parser
 */

pub mod model;

// Re-export types used by other modules
pub use model::{DocumentKind, ParsedContent, ParsedDocument, SourceFormat, TextSegment};
