//! Configuration schema definitions.

use std::path::PathBuf;

use serde::Deserialize;

/// Root configuration structure.
///
/// Section names are accepted both as written in `app.ini` (`[Database]`)
/// and lowercased.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Database location
    #[serde(alias = "Database")]
    pub database: DatabaseConfig,
    /// Grid display settings
    #[serde(alias = "Display")]
    pub display: DisplayConfig,
    /// Log output settings
    #[serde(alias = "Logging")]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite file
    pub db_location: Option<String>,
}

/// Display-related settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Minimum column width
    pub min_column_width: u16,
    /// Maximum column width
    pub max_column_width: u16,
    /// Width of the table list sidebar
    pub sidebar_width: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_column_width: 3,
            max_column_width: 40,
            sidebar_width: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// Log file; defaults to `<config dir>/sqlview/sqlview.log`
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
