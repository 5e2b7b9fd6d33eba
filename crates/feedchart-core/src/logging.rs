//! Logging infrastructure for feedchart.
//!
//! Structured logging using the `tracing` ecosystem. The dashboard writes JSON
//! lines to a daily rolling file under `~/.feedchart/logs/`. A human-readable
//! stderr layer is only attached in headless mode, because the terminal UI
//! owns the screen otherwise.
//!
//! ## Example
//!
//! ```no_run
//! use feedchart_core::logging::{self, LogOutput};
//!
//! let _guard = logging::init_logging(None, false, LogOutput::FileAndConsole).expect("logging init");
//!
//! tracing::info!("feedchart started");
//! tracing::debug!(category = "Grande", quantity = 3.0, "record applied");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{FeedChartError, Result};

/// Log file name prefix inside the log directory.
pub const LOG_FILE_NAME: &str = "feedchart.log";

/// Where log output goes besides the JSON log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// File only (terminal UI mode)
    FileOnly,
    /// File plus compact stderr output (headless mode)
    FileAndConsole,
}

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the feedchart logging system.
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.feedchart/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
/// * `output` - Whether to also log to stderr.
///
/// `RUST_LOG` overrides the level when set.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool, output: LogOutput) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| FeedChartError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("feedchart={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = (output == LogOutput::FileAndConsole).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(verbose)
            .with_line_number(verbose)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| FeedChartError::internal(format!("tracing already initialized: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, ?output, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path.
///
/// Returns `~/.feedchart/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| FeedChartError::Internal {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".feedchart").join("logs"))
}
