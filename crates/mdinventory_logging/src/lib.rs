//! Logging setup for the inventory binary.
//!
//! Console output goes to stderr so stdout stays reserved for run summaries.
//! A daily-rolling log file is kept under `<home>/logs` when that directory
//! can be created.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "mdinventory=info,markdown_file_inventory=info";
const VERBOSE_LOG_FILTER: &str = "mdinventory=debug,markdown_file_inventory=debug";
const MAX_LOG_FILES: usize = 5;

/// Environment variable overriding the state directory.
pub const HOME_ENV_VAR: &str = "MARKDOWN_INVENTORY_HOME";

/// Logging configuration for the inventory binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing: stderr console layer plus, when possible, a log file.
///
/// Hold the returned guard until exit so buffered file output is flushed.
/// A missing log directory only disables the file layer.
pub fn init_logging(config: LogConfig<'_>) -> Option<WorkerGuard> {
    let default_filter = if config.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };

    let mut log_guard = None;
    let mut file_error = None;
    let file_layer = match ensure_logs_dir().and_then(|dir| rolling_appender(&dir, config.app_name))
    {
        Ok(appender) => {
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            log_guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(build_filter(default_filter)),
            )
        }
        Err(err) => {
            file_error = Some(err);
            None
        }
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(build_filter(default_filter));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(err) = file_error {
        tracing::warn!("File logging disabled: {:#}", err);
    }
    log_guard
}

/// `RUST_LOG` when set, otherwise `default_filter`
fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn rolling_appender(dir: &Path, app_name: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(sanitize_name(app_name))
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))
}

/// State directory: `$MARKDOWN_INVENTORY_HOME` or `~/.markdown-file-inventory`.
pub fn inventory_home() -> Option<PathBuf> {
    if let Ok(override_path) = std::env::var(HOME_ENV_VAR) {
        return Some(PathBuf::from(override_path));
    }
    dirs::home_dir().map(|home| home.join(".markdown-file-inventory"))
}

/// Logs directory: `<home>/logs`.
pub fn logs_dir() -> Option<PathBuf> {
    inventory_home().map(|home| home.join("logs"))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("Could not determine home directory")?;
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
