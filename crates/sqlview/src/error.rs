//! Error types shared across the viewer.
//!
//! None of these are fatal to a session: the controller logs them and keeps
//! whatever state it had before the failing operation.

use thiserror::Error;

/// Failure to open or talk to the database handle itself.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database at {path}: {message}")]
    Open { path: String, message: String },
    #[error("database connection closed: {0}")]
    Closed(String),
    #[error(transparent)]
    Statement(#[from] StatementError),
}

/// Table or column metadata could not be read.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table `{0}` does not exist")]
    UnknownTable(String),
    #[error("failed to read metadata for `{table}`: {message}")]
    Metadata { table: String, message: String },
}

/// The primary key field of a submitted form is empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{column} has no data")]
pub struct ValidationError {
    pub column: String,
}

/// The store rejected or failed a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StatementError {
    pub message: String,
}

impl StatementError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a rejected insert, update or delete.
#[derive(Debug, Error)]
pub enum CrudError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("statement failed: {0}")]
    Statement(#[from] StatementError),
    #[error("database unavailable: {0}")]
    Connection(String),
    #[error("another change is still being applied")]
    Busy,
}

impl From<DbError> for CrudError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Statement(e) => CrudError::Statement(e),
            other => CrudError::Connection(other.to_string()),
        }
    }
}

/// The configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: config::ConfigError,
    },
}
