// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use meetparse::app_config::{self, Config};
use meetparse::{Controller, IngestSummary};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse meeting artifacts and print the normalized documents (default command)
    Parse(ParseArgs),

    /// Generate shell completions for meetparse
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Files or directories to parse
    #[arg(value_name = "INPUT_PATH")]
    input_paths: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "meetparse.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum number of files parsed at the same time
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

/// meetparse - Meeting artifact parser
///
/// Normalizes transcripts (txt, vtt, srt, json) and presentations (pdf) into
/// structured documents with speaker and timing metadata.
#[derive(Parser, Debug)]
#[command(name = "meetparse")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Normalize meeting transcripts and slides into structured documents")]
#[command(long_about = "meetparse reads meeting artifacts and prints one JSON report per file.

EXAMPLES:
    meetparse standup.vtt                      # Parse a single file
    meetparse notes/ recordings/call.srt      # Parse a directory and a file
    meetparse -j 8 --compact archive/          # Parse with 8 workers, compact output
    meetparse completions bash > meetparse.bash

SUPPORTED FORMATS:
    txt, vtt, srt, json  - transcripts
    pdf                  - presentations (one segment per page)
    pptx, key, m4a, mp3, wav - recognized, reported as placeholders")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    parse: ParseArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger accepts everything; the max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "meetparse", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Parse(args)) => run_parse(args).await,
        None => run_parse(cli.parse).await,
    }
}

async fn run_parse(options: ParseArgs) -> Result<()> {
    if options.input_paths.is_empty() {
        return Err(anyhow!("At least one INPUT_PATH is required"));
    }

    let config = load_config(&options)?;
    log::set_max_level((&config.log_level).into());

    for path in &options.input_paths {
        if !path.exists() {
            warn!("Input path does not exist: {:?}", path);
        }
    }

    let controller = Controller::with_config(config.clone())?;
    let reports = controller.ingest_paths(&options.input_paths).await?;

    for report in &reports {
        info!("{}", report.summary());
    }

    let output = if config.output.pretty {
        serde_json::to_string_pretty(&reports)
    } else {
        serde_json::to_string(&reports)
    }
    .context("Failed to serialize parse results")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output).context("Failed to write parse results")?;

    let summary = IngestSummary::from_reports(&reports);
    if summary.failed > 0 {
        warn!("{} of {} file(s) failed to parse", summary.failed, reports.len());
    }

    Ok(())
}

fn load_config(options: &ParseArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        Config::load_or_create(config_path)?
    };

    // Command line options override the file
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(concurrency) = options.concurrency {
        config.ingest.concurrent_parses = concurrency;
    }
    if options.compact {
        config.output.pretty = false;
    }
    if options.quiet {
        config.ingest.show_progress = false;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
