//! Configuration module for sqlview.
//!
//! Handles loading configuration from:
//! - Default values
//! - INI file (`app.ini` in the working directory, or `--config` / `SQLVIEW_CONFIG`)
//!
//! The database path itself may also come from the command line or the
//! `SQLVIEW_DB` environment variable; that precedence is resolved in `main`.

mod schema;

pub use schema::{Config, DatabaseConfig, DisplayConfig, LoggingConfig};

use std::path::{Path, PathBuf};

use config::{File, FileFormat};

use crate::error::ConfigError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "app.ini";

/// Returns the config file path.
///
/// Checks `SQLVIEW_CONFIG` first, then falls back to `app.ini`.
pub fn config_path() -> PathBuf {
    std::env::var_os("SQLVIEW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Returns the per-user directory used for the log file (~/.config/sqlview).
pub fn data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sqlview"))
}

/// Load configuration from an INI file. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let load_err = |source| ConfigError::Load {
        path: path.display().to_string(),
        source,
    };

    let settings = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini).required(false))
        .build()
        .map_err(load_err)?;

    settings.try_deserialize().map_err(load_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_ini(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.db_location.is_none());
        assert_eq!(config.display.max_column_width, 40);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults() {
        let config = load_config_from(Path::new("/nonexistent/sqlview/app.ini")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_parse_database_section() {
        let file = write_ini("[Database]\ndb_location = data/test.db\n");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.database.db_location.as_deref(), Some("data/test.db"));
        // Other sections keep their defaults
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    #[serial]
    fn test_parse_display_and_logging() {
        let file = write_ini(
            "[Database]\ndb_location = a.db\n\n[Display]\nmax_column_width = 25\n\n[Logging]\nlevel = debug\n",
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.display.max_column_width, 25);
        assert_eq!(config.display.min_column_width, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        std::env::set_var("SQLVIEW_CONFIG", "/tmp/custom.ini");
        let path = config_path();
        std::env::remove_var("SQLVIEW_CONFIG");
        assert_eq!(path, PathBuf::from("/tmp/custom.ini"));
        assert_eq!(config_path(), PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_unparseable_number_is_an_error() {
        let file = write_ini("[Display]\nmax_column_width = wide\n");
        assert!(load_config_from(file.path()).is_err());
    }
}
