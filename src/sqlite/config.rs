use crate::connection::ConnectionConfig;
use crate::driver::{DbConnection, Driver};
use crate::error::SqlPropsError;

use super::connection::SqliteConnection;

/// Built-in rusqlite driver.
///
/// The connection string is a database path or `:memory:`, optionally
/// prefixed with `sqlite:` or `sqlite://`. SQLite has no login, so the
/// resolved credentials are validated upstream but otherwise unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    /// Strip the optional URL-style prefix from a connection string.
    #[must_use]
    pub fn db_path(connection_string: &str) -> &str {
        let trimmed = connection_string.trim();
        trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed)
    }
}

impl Driver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn aliases(&self) -> &[&str] {
        &["rusqlite", "sqlite3"]
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DbConnection>, SqlPropsError> {
        let db_path = Self::db_path(config.connection_string());
        if db_path.is_empty() {
            return Err(SqlPropsError::ConnectionError(
                "SQLite connection string does not name a database".to_string(),
            ));
        }
        let conn = rusqlite::Connection::open(db_path).map_err(|e| {
            SqlPropsError::ConnectionError(format!("Failed to open SQLite database {db_path}: {e}"))
        })?;
        tracing::debug!(db_path, "SQLite ignores username/password");
        Ok(Box::new(SqliteConnection::new(conn)))
    }
}
