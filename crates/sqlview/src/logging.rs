//! File logging. The terminal belongs to the UI, so log lines go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingConfig};

const LOG_FILE: &str = "sqlview.log";

/// Resolve the log file: the configured path, else `<config dir>/sqlview/sqlview.log`,
/// else `sqlview.log` in the working directory.
pub fn log_path(cfg: &LoggingConfig) -> PathBuf {
    cfg.file
        .clone()
        .or_else(|| config::data_dir().map(|dir| dir.join(LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(cfg: &LoggingConfig) -> Result<PathBuf> {
    let path = log_path(cfg);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        // Fall back to the configured level if RUST_LOG is unset or invalid
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cfg.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(path)
}
