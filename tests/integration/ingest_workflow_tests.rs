/*!
 * Integration tests for concurrent batch ingest
 */

use anyhow::Result;
use meetparse::app_config::Config;
use meetparse::document::{DocumentKind, SourceFormat};
use meetparse::errors::{AppError, ParseErrorKind};
use meetparse::{Controller, IngestOutcome, IngestSummary};

use crate::common;

fn quiet_config() -> Config {
    common::init_test_logging();
    let mut config = Config::default();
    config.ingest.show_progress = false;
    config
}

#[tokio::test]
async fn test_ingest_paths_withMixedDirectory_shouldIsolateFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "01-standup.vtt", common::SAMPLE_VTT)?;
    common::create_test_file(dir, "02-broken.vtt", "no header here")?;
    common::create_test_file(dir, "03-retro.srt", common::SAMPLE_SRT)?;
    common::create_test_bytes(dir, "04-call.m4a", b"\x00\x00\x00\x20ftypM4A")?;
    common::create_test_file(dir, "05-export.json", common::SAMPLE_JSON)?;
    common::create_test_file(dir, "06-deck.pptx", "PK")?;
    common::create_test_bytes(dir, "07-slides.pdf", b"%PDF-garbage")?;

    let controller = Controller::with_config(quiet_config())?;
    let reports = controller.ingest_paths(&[dir]).await?;

    let names: Vec<&str> = reports.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "01-standup.vtt",
            "02-broken.vtt",
            "03-retro.srt",
            "04-call.m4a",
            "05-export.json",
            "06-deck.pptx",
            "07-slides.pdf",
        ]
    );

    assert!(matches!(reports[0].outcome, IngestOutcome::Parsed { .. }));
    assert_eq!(reports[1].error().map(|e| e.kind()), Some(ParseErrorKind::InvalidFormat));
    assert_eq!(reports[2].document().map(|d| d.segments.len()), Some(3));
    assert!(matches!(reports[3].outcome, IngestOutcome::Placeholder { .. }));
    assert_eq!(
        reports[4].document().map(|d| d.source_format),
        Some(SourceFormat::Json)
    );
    assert!(matches!(reports[5].outcome, IngestOutcome::Placeholder { .. }));
    assert_eq!(reports[6].error().map(|e| e.kind()), Some(ParseErrorKind::UnableToLoad));

    assert_eq!(
        IngestSummary::from_reports(&reports),
        IngestSummary {
            parsed: 3,
            placeholders: 2,
            failed: 2
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_ingest_paths_withSingleWorker_shouldPreserveInputOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let b = common::create_test_file(temp_dir.path(), "b.txt", "second")?;
    let a = common::create_test_file(temp_dir.path(), "a.txt", "first")?;

    let mut config = quiet_config();
    config.ingest.concurrent_parses = 1;
    let controller = Controller::with_config(config)?;

    let reports = controller.ingest_paths(&[b, a]).await?;
    let texts: Vec<&str> = reports
        .iter()
        .filter_map(|r| r.document())
        .map(|d| d.full_text.as_str())
        .collect();
    assert_eq!(texts, vec!["second", "first"]);
    Ok(())
}

#[tokio::test]
async fn test_ingest_paths_withMissingAndUnknownFiles_shouldReportEachFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("gone.srt");
    let unknown = common::create_test_file(temp_dir.path(), "minutes.docx", "binary-ish")?;

    let controller = Controller::with_config(quiet_config())?;
    let reports = controller.ingest_paths(&[missing, unknown]).await?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].error().map(|e| e.kind()), Some(ParseErrorKind::UnreadableFile));
    assert_eq!(reports[1].error().map(|e| e.kind()), Some(ParseErrorKind::UnsupportedFormat));
    Ok(())
}

#[tokio::test]
async fn test_ingest_paths_withOversizedFile_shouldFailUnreadable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "long.txt", &"word ".repeat(100))?;

    let mut config = quiet_config();
    config.ingest.max_file_bytes = 64;
    let controller = Controller::with_config(config)?;

    let reports = controller.ingest_paths(&[path]).await?;
    assert_eq!(reports[0].error().map(|e| e.kind()), Some(ParseErrorKind::UnreadableFile));
    Ok(())
}

#[tokio::test]
async fn test_ingest_paths_withEmptyInput_shouldReturnNoReports() -> Result<()> {
    let controller = Controller::with_config(quiet_config())?;
    let inputs: Vec<std::path::PathBuf> = Vec::new();

    let reports = controller.ingest_paths(&inputs).await?;
    assert!(reports.is_empty());
    Ok(())
}

#[test]
fn test_with_config_withZeroConcurrency_shouldFail() {
    let mut config = quiet_config();
    config.ingest.concurrent_parses = 0;
    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_ingest_paths_withBrokenLinkInDirectory_shouldFailWithFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().join("batch");
    common::create_test_file(&dir, "kept.txt", "hello")?;
    std::os::unix::fs::symlink(temp_dir.path().join("missing.vtt"), dir.join("dangling.vtt"))?;

    let controller = Controller::with_config(quiet_config())?;
    let result = controller.ingest_paths(&[dir]).await;

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}

#[test]
fn test_ingest_file_withTranscript_shouldReportDocumentKind() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "standup.vtt", common::SAMPLE_VTT)?;

    let controller = Controller::with_config(quiet_config())?;
    let report = controller.ingest_file(&path);

    let document = report.document().expect("transcript should parse");
    assert_eq!(document.document_kind, DocumentKind::Transcript);
    assert_eq!(document.source_file_name, "standup.vtt");
    assert!(report.summary().contains("2 segment(s)"));
    Ok(())
}

#[tokio::test]
async fn test_report_serialize_withFailure_shouldFlattenStatusAndError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "{")?;

    let controller = Controller::with_config(quiet_config())?;
    let reports = controller.ingest_paths(&[path]).await?;
    let json = serde_json::to_value(&reports[0])?;

    assert_eq!(json["status"], "failed");
    assert_eq!(json["fileName"], "bad.json");
    assert_eq!(json["error"]["kind"], "invalid_format");
    Ok(())
}
