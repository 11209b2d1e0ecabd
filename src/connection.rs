use std::fmt;

use crate::driver::{DbConnection, Driver, DriverRegistry};
use crate::error::SqlPropsError;
use crate::helpers::{all_not_blank, mask_password};

/// Everything needed to open one connection, credentials already resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    driver: String,
    connection_string: String,
    username: String,
    password: String,
}

impl ConnectionConfig {
    /// # Errors
    /// Returns `SqlPropsError::ConfigError` if any field is blank.
    pub fn new(
        driver: impl Into<String>,
        connection_string: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SqlPropsError> {
        let cfg = Self {
            driver: driver.into(),
            connection_string: connection_string.into(),
            username: username.into(),
            password: password.into(),
        };
        if !all_not_blank(&[Some(cfg.driver.as_str()), Some(cfg.connection_string.as_str())]) {
            return Err(SqlPropsError::ConfigError(
                "driver and connection string are required".to_string(),
            ));
        }
        if !all_not_blank(&[Some(cfg.username.as_str()), Some(cfg.password.as_str())]) {
            return Err(SqlPropsError::ConfigError(
                "SQL username and password must be set".to_string(),
            ));
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn driver(&self) -> &str {
        &self.driver
    }

    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("connection_string", &self.connection_string)
            .field("username", &self.username)
            .field("password", &mask_password(&self.password))
            .finish()
    }
}

/// Resolve the configured driver and open a connection with it.
///
/// The caller owns the returned connection and must close it.
///
/// # Errors
/// Returns `SqlPropsError::DriverInit` if the driver is unknown or fails to
/// initialize, `SqlPropsError::ConnectionError` if connecting fails.
pub fn open(
    registry: &DriverRegistry,
    config: &ConnectionConfig,
) -> Result<Box<dyn DbConnection>, SqlPropsError> {
    let driver = registry.resolve(config.driver())?;
    connect(driver.as_ref(), config)
}

/// Open a connection with an already initialized driver.
///
/// # Errors
/// Returns `SqlPropsError::ConnectionError` if connecting fails.
pub fn connect(
    driver: &dyn Driver,
    config: &ConnectionConfig,
) -> Result<Box<dyn DbConnection>, SqlPropsError> {
    tracing::debug!(?config, "opening database connection");
    driver.connect(config).map_err(|err| match err {
        SqlPropsError::ConnectionError(_) => err,
        other => SqlPropsError::ConnectionError(format!(
            "could not connect to '{}': {other}",
            config.connection_string()
        )),
    })
}
