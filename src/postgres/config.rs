use tokio_postgres::{Config as PgConfig, NoTls};

use crate::connection::ConnectionConfig;
use crate::driver::{DbConnection, Driver};
use crate::error::SqlPropsError;

use super::connection::PostgresConnection;

/// Built-in tokio-postgres driver.
///
/// The connection string is anything `tokio_postgres::Config` parses
/// (`host=... dbname=...` or a `postgresql://` URL). The resolved
/// username and password always override the ones in the string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl PostgresDriver {
    /// Parse the connection string and apply the resolved credentials.
    ///
    /// # Errors
    /// Returns `SqlPropsError::ConfigError` if the connection string cannot be parsed
    /// or does not name a database.
    pub fn pg_config(config: &ConnectionConfig) -> Result<PgConfig, SqlPropsError> {
        let mut pg_config: PgConfig = config.connection_string().trim().parse().map_err(
            |e: tokio_postgres::Error| {
                SqlPropsError::ConfigError(format!("invalid Postgres connection string: {e}"))
            },
        )?;

        if pg_config.get_dbname().is_none() {
            return Err(SqlPropsError::ConfigError("dbname is required".to_string()));
        }
        if pg_config.get_hosts().is_empty() {
            pg_config.host("localhost");
        }
        pg_config.user(config.username());
        pg_config.password(config.password());
        Ok(pg_config)
    }
}

impl Driver for PostgresDriver {
    fn name(&self) -> &str {
        "postgres"
    }

    fn aliases(&self) -> &[&str] {
        &["postgresql", "tokio-postgres"]
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DbConnection>, SqlPropsError> {
        let pg_config = Self::pg_config(config)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                SqlPropsError::ConnectionError(format!("Failed to start Postgres runtime: {e}"))
            })?;

        let (client, connection) = runtime
            .block_on(pg_config.connect(NoTls))
            .map_err(|e| SqlPropsError::ConnectionError(format!("Postgres connect failed: {e}")))?;

        // Only polled while the runtime is blocked on a client call.
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "postgres connection closed with error");
            }
        });
        tracing::debug!("postgres connection established");

        Ok(Box::new(PostgresConnection::new(runtime, client)))
    }
}
