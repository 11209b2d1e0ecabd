//! Driver and connection abstractions.
//!
//! A [`Driver`] is looked up by identifier in a [`DriverRegistry`] and opens a
//! single blocking [`DbConnection`]. Backends are feature-gated; callers can
//! register their own drivers next to the built-in ones.

use std::sync::Arc;

use crate::connection::ConnectionConfig;
use crate::error::SqlPropsError;
use crate::results::ResultSet;

/// One live database connection owned by a single invocation.
///
/// Auto-commit follows JDBC semantics: while it is off, statements run inside
/// an implicit transaction that lasts until `commit` or `rollback`; switching
/// it back on commits any open transaction.
pub trait DbConnection {
    /// Current auto-commit flag.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if the backend cannot report the state.
    fn auto_commit(&mut self) -> Result<bool, SqlPropsError>;

    /// # Errors
    /// Returns `SqlPropsError` if the backend rejects the change.
    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<(), SqlPropsError>;

    /// Run an INSERT/UPDATE/DELETE (or DDL) and return the affected row count.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if preparing or executing the statement fails.
    fn execute_update(&mut self, sql: &str) -> Result<u64, SqlPropsError>;

    /// Run a stored-procedure invocation, discarding any result.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if preparing or executing the call fails.
    fn execute_call(&mut self, sql: &str) -> Result<(), SqlPropsError>;

    /// Run a SELECT once and materialize every row.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if the query or row extraction fails.
    fn query(&mut self, sql: &str) -> Result<ResultSet, SqlPropsError>;

    /// # Errors
    /// Returns `SqlPropsError` if the backend fails to commit.
    fn commit(&mut self) -> Result<(), SqlPropsError>;

    /// # Errors
    /// Returns `SqlPropsError` if the backend fails to roll back.
    fn rollback(&mut self) -> Result<(), SqlPropsError>;

    /// # Errors
    /// Returns `SqlPropsError` if the backend reports a failure on close.
    fn close(self: Box<Self>) -> Result<(), SqlPropsError>;
}

/// A named database driver.
pub trait Driver: Send + Sync {
    /// Canonical identifier, e.g. `sqlite`.
    fn name(&self) -> &str;

    /// Additional identifiers accepted for this driver.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Load whatever the driver needs before a connection can be attempted.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if the driver cannot be used in this process.
    fn initialize(&self) -> Result<(), SqlPropsError> {
        Ok(())
    }

    /// Open a connection with already resolved credentials.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if the connection cannot be established.
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DbConnection>, SqlPropsError>;
}

/// Drivers known to this process, looked up by case-insensitive identifier.
#[derive(Clone)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// A registry without any driver.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// A registry holding every driver compiled into this build.
    #[must_use]
    pub fn with_builtin_drivers() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "sqlite")]
        registry.register(crate::sqlite::SqliteDriver);
        #[cfg(feature = "postgres")]
        registry.register(crate::postgres::PostgresDriver);
        registry
    }

    /// Add a driver. Later registrations win over earlier ones with the same identifier.
    pub fn register<D: Driver + 'static>(&mut self, driver: D) -> &mut Self {
        self.drivers.insert(0, Arc::new(driver));
        self
    }

    /// Identifiers of every registered driver, aliases included.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.drivers
            .iter()
            .flat_map(|d| {
                std::iter::once(d.name().to_string())
                    .chain(d.aliases().iter().map(|a| (*a).to_string()))
            })
            .collect()
    }

    /// Find and initialize the driver registered under `id`.
    ///
    /// # Errors
    /// Returns `SqlPropsError::DriverInit` if no driver matches or its initialization fails.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Driver>, SqlPropsError> {
        let wanted = id.trim();
        let driver = self
            .drivers
            .iter()
            .find(|d| {
                d.name().eq_ignore_ascii_case(wanted)
                    || d.aliases().iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| SqlPropsError::DriverInit {
                driver: wanted.to_string(),
                reason: format!(
                    "no such driver (known: {})",
                    self.identifiers().join(", ")
                ),
            })?;

        driver.initialize().map_err(|err| SqlPropsError::DriverInit {
            driver: wanted.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Arc::clone(driver))
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_builtin_drivers()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.identifiers())
            .finish()
    }
}
