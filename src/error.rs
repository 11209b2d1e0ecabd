use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

#[derive(Debug, Error)]
pub enum SqlPropsError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database driver '{driver}' could not be initialized: {reason}")]
    DriverInit { driver: String, reason: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("PRE statements failed: {0}")]
    PreStatementError(String),

    #[error("Could not commit transaction: {0}")]
    CommitError(String),

    #[error("Cannot load properties: {0}")]
    SelectionError(String),
}

impl SqlPropsError {
    /// True for the errors that abort an invocation before a connection was opened.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::DriverInit { .. })
    }
}
