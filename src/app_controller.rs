use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::dispatcher::Dispatcher;
use crate::document::ParsedDocument;
use crate::errors::{AppError, ParseError};
use crate::file_utils::{FileManager, SourceFile};

// @module: Batch ingest of meeting artifacts

/// Result of ingesting one file. A failure never affects other files.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    /// Parsed by a format parser
    Parsed { document: ParsedDocument },
    /// No parser exists for this kind of file yet
    Placeholder { document: ParsedDocument },
    /// The file could not be parsed
    Failed { error: ParseError },
}

/// One file's entry in a batch result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub path: PathBuf,
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: IngestOutcome,
}

impl IngestReport {
    fn failed(file: &SourceFile, error: ParseError) -> Self {
        Self {
            path: file.path.clone(),
            file_name: file.file_name.clone(),
            outcome: IngestOutcome::Failed { error },
        }
    }

    /// The produced document, placeholder included
    pub fn document(&self) -> Option<&ParsedDocument> {
        match &self.outcome {
            IngestOutcome::Parsed { document } | IngestOutcome::Placeholder { document } => Some(document),
            IngestOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match &self.outcome {
            IngestOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// One-line human readable status
    pub fn summary(&self) -> String {
        match &self.outcome {
            IngestOutcome::Parsed { document } => format!(
                "{}: parsed as {} ({} segment(s), {} chars)",
                self.file_name,
                document.source_format,
                document.segments.len(),
                document.full_text.chars().count()
            ),
            IngestOutcome::Placeholder { document } => {
                format!("{}: placeholder ({} not supported yet)", self.file_name, document.document_kind)
            }
            IngestOutcome::Failed { error } => format!("{}: failed to parse: {}", self.file_name, error),
        }
    }
}

/// Counts over a batch result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub parsed: usize,
    pub placeholders: usize,
    pub failed: usize,
}

impl IngestSummary {
    pub fn from_reports(reports: &[IngestReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match report.outcome {
                IngestOutcome::Parsed { .. } => summary.parsed += 1,
                IngestOutcome::Placeholder { .. } => summary.placeholders += 1,
                IngestOutcome::Failed { .. } => summary.failed += 1,
            }
            summary
        })
    }
}

/// Main application controller for document ingest
pub struct Controller {
    // @field: App configuration
    config: Config,
    dispatcher: Arc<Dispatcher>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        Self::with_dispatcher(config, Dispatcher::default())
    }

    /// Create a controller with a custom dispatcher
    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config,
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingest a single file synchronously
    pub fn ingest_file<P: AsRef<Path>>(&self, path: P) -> IngestReport {
        ingest_source(&self.dispatcher, &SourceFile::from_path(path), self.config.ingest.max_file_bytes)
    }

    /// Ingest files and directories. Directories are scanned recursively for known extensions.
    pub async fn ingest_paths<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<IngestReport>, AppError> {
        let files = FileManager::collect_inputs(inputs, self.config.ingest.follow_links)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        if files.is_empty() {
            warn!("No files to ingest");
        }

        Ok(self.ingest(files).await)
    }

    /// Parse every file on the blocking pool, bounded by `concurrent_parses`.
    ///
    /// Reports come back in input order, one per file.
    pub async fn ingest(&self, files: Vec<SourceFile>) -> Vec<IngestReport> {
        let start_time = Instant::now();
        let total = files.len();
        let progress = self.progress_bar(total as u64);
        let max_bytes = self.config.ingest.max_file_bytes;

        let mut reports: Vec<(usize, IngestReport)> = stream::iter(files.into_iter().enumerate())
            .map(|(position, file)| {
                let dispatcher = Arc::clone(&self.dispatcher);
                async move {
                    let fallback = file.clone();
                    let report = tokio::task::spawn_blocking(move || ingest_source(&dispatcher, &file, max_bytes))
                        .await
                        .unwrap_or_else(|e| {
                            error!("Parse task for {} aborted: {}", fallback.file_name, e);
                            IngestReport::failed(&fallback, ParseError::UnreadableFile(format!("parse task aborted: {}", e)))
                        });
                    (position, report)
                }
            })
            .buffer_unordered(self.config.ingest.concurrent_parses)
            .inspect(|(_, report)| {
                progress.set_message(report.file_name.clone());
                progress.inc(1);
            })
            .collect()
            .await;

        progress.finish_and_clear();
        reports.sort_by_key(|(position, _)| *position);
        let reports: Vec<IngestReport> = reports.into_iter().map(|(_, report)| report).collect();

        let summary = IngestSummary::from_reports(&reports);
        info!(
            "Ingested {} file(s) in {:.2}s: {} parsed, {} placeholder(s), {} failed",
            total,
            start_time.elapsed().as_secs_f64(),
            summary.parsed,
            summary.placeholders,
            summary.failed
        );

        reports
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.config.ingest.show_progress || total == 0 {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }
}

/// Read and parse one file. Never panics on bad input and never fails the batch.
fn ingest_source(dispatcher: &Dispatcher, file: &SourceFile, max_bytes: u64) -> IngestReport {
    let Some(kind) = file.kind else {
        let error = ParseError::UnsupportedFormat(format!("unrecognized file extension '{}'", file.extension));
        warn!("Skipping {}: {}", file.file_name, error);
        return IngestReport::failed(file, error);
    };

    let raw = match FileManager::read_bytes(&file.path, max_bytes) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read {}: {}", file.file_name, e);
            return IngestReport::failed(file, e);
        }
    };

    let outcome = match dispatcher.parse_or_placeholder(&raw, &file.extension, kind, &file.file_name) {
        Ok(document) if document.is_placeholder() => {
            warn!("{}: {} files are not supported yet, using a placeholder", file.file_name, file.extension);
            IngestOutcome::Placeholder { document }
        }
        Ok(document) => {
            debug!(
                "{}: {} segment(s) from {}",
                file.file_name,
                document.segments.len(),
                document.source_format
            );
            IngestOutcome::Parsed { document }
        }
        Err(error) => {
            error!("Failed to parse {}: {}", file.file_name, error);
            IngestOutcome::Failed { error }
        }
    };

    IngestReport {
        path: file.path.clone(),
        file_name: file.file_name.clone(),
        outcome,
    }
}
