/*!
 * Integration tests for the parse entry point across every format
 */

use meetparse::document::{DocumentKind, SourceFormat};
use meetparse::errors::ParseErrorKind;
use meetparse::{parse, timestamp};

use crate::common;

/// Full text must be reproducible from the segments for every round-trippable format
fn assert_round_trip(document: &meetparse::ParsedDocument) {
    assert_eq!(
        document.reassembled_text(),
        document.full_text,
        "{} segments do not reassemble into full_text",
        document.source_format
    );
}

#[test]
fn test_vtt_workflow_withVoiceTags_shouldAttributeSpeakers() {
    let document = parse(common::SAMPLE_VTT.as_bytes(), "vtt", DocumentKind::Transcript, "standup.vtt").unwrap();

    assert_eq!(document.source_format, SourceFormat::WebVtt);
    assert_eq!(document.segments.len(), 2);

    let first = &document.segments[0];
    assert_eq!(first.speaker.as_deref(), Some("Sarah Chen"));
    assert_eq!(first.content, "Good morning everyone.");
    assert_eq!(first.start_time, Some(0.0));
    assert_eq!(first.end_time, Some(5.0));

    assert_eq!(
        document.full_text,
        "Sarah Chen: Good morning everyone.\n\nMike Rodriguez: Thanks for joining."
    );
    assert_eq!(document.speakers(), vec!["Sarah Chen", "Mike Rodriguez"]);
    assert_eq!(document.duration(), Some(10.0));
    assert_round_trip(&document);
}

#[test]
fn test_vtt_workflow_withoutHeader_shouldFailInvalidFormat() {
    let input = "00:00:00.000 --> 00:00:05.000\nHello\n";
    let error = parse(input.as_bytes(), "vtt", DocumentKind::Transcript, "bad.vtt").unwrap_err();
    assert_eq!(error.kind(), ParseErrorKind::InvalidFormat);
}

#[test]
fn test_srt_workflow_withMultilineCue_shouldJoinWithSingleSpace() {
    let input = "1\n00:00:00,000 --> 00:00:05,000\nThis is a subtitle\nthat spans multiple lines.\n";
    let document = parse(input.as_bytes(), "srt", DocumentKind::Transcript, "one.srt").unwrap();

    assert_eq!(document.segments.len(), 1);
    assert_eq!(document.segments[0].content, "This is a subtitle that spans multiple lines.");
    assert_eq!(document.segments[0].start_time, Some(0.0));
    assert_eq!(document.segments[0].end_time, Some(5.0));
    assert_round_trip(&document);
}

#[test]
fn test_srt_workflow_withWindowsLineEndings_shouldParseAllBlocks() {
    let input = common::SAMPLE_SRT.replace('\n', "\r\n");
    let document = parse(input.as_bytes(), "srt", DocumentKind::Transcript, "crlf.srt").unwrap();

    assert_eq!(document.segments.len(), 3);
    assert_eq!(
        document.segments[1].content,
        "Let's start with the roadmap and then move on to hiring."
    );
    assert_eq!(document.segments[1].end_time, Some(9.5));
    assert_round_trip(&document);
}

#[test]
fn test_srt_workflow_withMalformedBlock_shouldSkipOnlyThatBlock() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nKept\n\ngarbage without timing\n\n3\n00:00:03,000 --> 00:00:04,000\nAlso kept\n";
    let document = parse(input.as_bytes(), "srt", DocumentKind::Transcript, "damaged.srt").unwrap();

    let contents: Vec<&str> = document.segments.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["Kept", "Also kept"]);
    assert_round_trip(&document);
}

#[test]
fn test_json_workflow_withTextAndSegments_shouldPreferTextForFullText() {
    let document = parse(common::SAMPLE_JSON.as_bytes(), "json", DocumentKind::Transcript, "export.json").unwrap();

    assert_eq!(document.full_text, "Hello team. Quick update on the launch.");
    assert_eq!(document.segments.len(), 2);
    assert_eq!(document.segments[1].start_time, Some(1.5));
    assert_eq!(document.segments[1].speaker.as_deref(), Some("Ana"));
}

#[test]
fn test_json_workflow_withTranscriptOnly_shouldWrapWholeText() {
    let input = r#"{"transcript": "Everything in one block."}"#;
    let document = parse(input.as_bytes(), "json", DocumentKind::Transcript, "flat.json").unwrap();

    assert_eq!(document.segments.len(), 1);
    assert_eq!(document.segments[0].content, "Everything in one block.");
    assert_eq!(document.segments[0].start_time, None);
    assert_eq!(document.full_text, "Everything in one block.");
    assert_round_trip(&document);
}

#[test]
fn test_json_workflow_withBareArray_shouldJoinSegmentsWithBlankLine() {
    let input = r#"[{"text": "First", "start": 0, "end": 1}, {"text": "Second", "start": 1, "end": 2.5}]"#;
    let document = parse(input.as_bytes(), "json", DocumentKind::Transcript, "array.json").unwrap();

    assert_eq!(document.segments.len(), 2);
    assert_eq!(document.full_text, "First\n\nSecond");
    assert_eq!(document.segments[1].end_time, Some(2.5));
    assert_round_trip(&document);
}

#[test]
fn test_json_workflow_withUnrecognizedShape_shouldFailInvalidFormat() {
    for input in [r#"{"words": []}"#, "42", r#""just a string""#, "not json at all"] {
        let error = parse(input.as_bytes(), "json", DocumentKind::Transcript, "odd.json").unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::InvalidFormat, "input: {}", input);
    }
}

#[test]
fn test_plain_workflow_withEmptyAndUnicodeInput_shouldKeepTextVerbatim() {
    for input in ["", "  leading and trailing  \n", "Résumé – 会議メモ\n\nline two"] {
        let document = parse(input.as_bytes(), "txt", DocumentKind::Transcript, "notes.txt").unwrap();
        assert_eq!(document.segments.len(), 1);
        assert_eq!(document.segments[0].content, input);
        assert_eq!(document.full_text, input);
        assert_round_trip(&document);
    }
}

#[test]
fn test_text_workflow_withInvalidUtf8_shouldFailUnreadable() {
    let raw = [0x57, 0x45, 0xff, 0xfe];
    for extension in ["txt", "vtt", "srt"] {
        let error = parse(&raw, extension, DocumentKind::Transcript, "binary").unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::UnreadableFile, "extension: {}", extension);
    }
}

#[test]
fn test_pdf_workflow_withGarbageBytes_shouldFailUnableToLoad() {
    let error = parse(b"definitely not a pdf", "pdf", DocumentKind::Presentation, "deck.pdf").unwrap_err();
    assert_eq!(error.kind(), ParseErrorKind::UnableToLoad);
}

#[test]
fn test_timestamp_withNonNumericSeconds_shouldDefaultFieldToZero() {
    assert_eq!(timestamp::normalize("00:00:xx"), Some(0.0));
    assert_eq!(timestamp::normalize("00:01:xx"), Some(60.0));
    assert_eq!(timestamp::normalize("01:02:03.500"), Some(3723.5));
    assert_eq!(timestamp::normalize("02:03,250"), Some(123.25));
}

#[test]
fn test_parse_twice_withIdenticalInput_shouldProduceIdenticalContent() {
    let inputs = [
        (common::SAMPLE_VTT, "vtt"),
        (common::SAMPLE_SRT, "srt"),
        (common::SAMPLE_JSON, "json"),
        ("plain notes", "txt"),
    ];

    for (input, extension) in inputs {
        let first = parse(input.as_bytes(), extension, DocumentKind::Transcript, "same").unwrap();
        let second = parse(input.as_bytes(), extension, DocumentKind::Transcript, "same").unwrap();

        assert_eq!(first.full_text, second.full_text);
        assert_eq!(first.segments, second.segments);
        assert_eq!(first.source_digest, second.source_digest);
        assert_ne!(first.id, second.id);
    }
}

#[test]
fn test_parsed_document_serialize_shouldUseCamelCaseAndSkipMissingFields() {
    let document = parse(b"hello", "txt", DocumentKind::Transcript, "hello.txt").unwrap();
    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["sourceFileName"], "hello.txt");
    assert_eq!(json["documentKind"], "transcript");
    assert_eq!(json["fullText"], "hello");
    assert!(json["parsedAt"].is_string());
    assert!(json["segments"][0].get("startTime").is_none());
    assert!(json["segments"][0].get("speaker").is_none());
}
