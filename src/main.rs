// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::app_config::Config;
use app_controller::Controller;
use errors::JobError;

mod app_config;
mod app_controller;
mod classify;
mod document;
mod errors;
mod file_utils;
mod formats;
mod providers;
mod translation;

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

/// tabtrans - batch translation for tabular documents
///
/// Translates the text cells of a delimited text file or spreadsheet
/// workbook, caching translations across runs and checkpointing progress on
/// interruption.
#[derive(Parser, Debug)]
#[command(name = "tabtrans")]
#[command(version = "1.0.0")]
#[command(about = "Batch-translate csv/xlsx documents with a persistent translation cache")]
#[command(long_about = "tabtrans extracts every text cell of a tabular document, deduplicates the
fragments, translates them through an external service with bounded retries,
and writes a sibling output file. Numeric values, URLs and marker-prefixed
strings pass through untouched. Translations are cached in a JSON file so
re-runs and interrupted runs never pay for the same fragment twice.

EXAMPLES:
    tabtrans entrada.csv                      # Translate using default config
    tabtrans -s es -t pt entrada.xlsx         # Explicit language pair
    tabtrans -d ',' entrada.csv               # Comma-delimited input
    tabtrans --log-level debug entrada.csv    # Verbose diagnostics

EXIT CODES:
    0    completed
    1    startup or I/O failure
    2    translation quota exhausted (cache flushed first)
    130  interrupted (cache and partial output checkpointed first)")]
struct CommandLineOptions {
    /// Input document to translate (csv, tsv, txt, or xlsx)
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Source language code (e.g., 'es', 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Field delimiter for delimited text input
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Translation cache file path
    #[arg(long)]
    cache_path: Option<String>,

    /// Translation service endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "tabtrans.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// Custom logger: timestamped, colored, to stderr so progress bars on stdout
// stay intact.
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

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
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default; the level is
    // adjusted after loading the config.
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            match e.downcast_ref::<JobError>() {
                Some(JobError::FatalQuota(_)) => ExitCode::from(2),
                Some(JobError::Interrupted) => ExitCode::from(130),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = PathBuf::from(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            options.config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(&config_path, config_json)
            .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(source) = &options.source_language {
        config.source_language = source.clone();
    }
    if let Some(target) = &options.target_language {
        config.target_language = target.clone();
    }
    if let Some(delimiter) = options.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(cache_path) = &options.cache_path {
        config.cache_path = cache_path.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        config.translation.endpoint = endpoint.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;
    controller.run(&options.input_path).await
}
