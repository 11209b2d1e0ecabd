use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::connection::ConnectionConfig;
use crate::credentials::CredentialResolver;
use crate::error::SqlPropsError;
use crate::helpers::{all_not_blank, is_blank, mask_password};
use crate::statement::Statement;

/// Invocation parameters as supplied by the host build.
///
/// JSON keys are camelCase (`driverClassname`, `connectionString`,
/// `sqlUsername`, `sqlPassword`, `sqlKey`, `selectStatement`,
/// `preSqlStatements`). A `null` entry in `preSqlStatements` is skipped.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadConfig {
    pub driver_classname: Option<String>,
    pub connection_string: Option<String>,
    pub sql_username: Option<String>,
    pub sql_password: Option<String>,
    pub sql_key: Option<String>,
    pub select_statement: Option<String>,
    pub pre_sql_statements: Vec<Option<Statement>>,
}

impl LoadConfig {
    /// # Errors
    /// Returns `SqlPropsError` if the file cannot be read or is not valid JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SqlPropsError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overlay `other` on top of `self`: set fields win, a non-empty
    /// statement list replaces the current one.
    #[must_use]
    pub fn merge(self, other: LoadConfig) -> LoadConfig {
        LoadConfig {
            driver_classname: other.driver_classname.or(self.driver_classname),
            connection_string: other.connection_string.or(self.connection_string),
            sql_username: other.sql_username.or(self.sql_username),
            sql_password: other.sql_password.or(self.sql_password),
            sql_key: other.sql_key.or(self.sql_key),
            select_statement: other.select_statement.or(self.select_statement),
            pre_sql_statements: if other.pre_sql_statements.is_empty() {
                self.pre_sql_statements
            } else {
                other.pre_sql_statements
            },
        }
    }

    /// Check the required parameters before anything touches the database.
    ///
    /// # Errors
    /// Returns `SqlPropsError::ConfigError` if driver, connection string or
    /// select statement is blank, or if neither `sql_key` nor both
    /// username and password are given.
    pub fn validate(&self) -> Result<(), SqlPropsError> {
        if !all_not_blank(&[
            self.driver_classname.as_deref(),
            self.connection_string.as_deref(),
            self.select_statement.as_deref(),
        ]) {
            return Err(SqlPropsError::ConfigError(
                "All SQL-related parameters are required.".to_string(),
            ));
        }
        if is_blank(self.sql_key.as_deref())
            && !all_not_blank(&[self.sql_username.as_deref(), self.sql_password.as_deref()])
        {
            return Err(SqlPropsError::ConfigError(
                "Either sqlKey or sqlUsername and sqlPassword must be set.".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve credentials and build the connection settings.
    ///
    /// A non-blank `sql_key` takes precedence: its credentials must resolve to
    /// a non-blank username and password. Otherwise the direct username and
    /// password are used.
    ///
    /// # Errors
    /// Returns `SqlPropsError::ConfigError` if validation or credential
    /// resolution fails.
    pub fn connection_config(
        &self,
        resolver: &dyn CredentialResolver,
    ) -> Result<ConnectionConfig, SqlPropsError> {
        self.validate()?;

        let (username, password) = match self.sql_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                let resolved = resolver.resolve_credential(key).map_err(|err| {
                    tracing::error!(
                        sql_key = key,
                        error = %err,
                        "Could not decode username / password from sqlKey"
                    );
                    SqlPropsError::ConfigError("sqlKey is invalid.".to_string())
                })?;
                if !all_not_blank(&[
                    Some(resolved.username.as_str()),
                    Some(resolved.password.as_str()),
                ]) {
                    tracing::error!(sql_key = key, "Could not decode username / password from sqlKey");
                    return Err(SqlPropsError::ConfigError("sqlKey is invalid.".to_string()));
                }
                (resolved.username, resolved.password)
            }
            _ => (
                self.sql_username.clone().unwrap_or_default(),
                self.sql_password.clone().unwrap_or_default(),
            ),
        };

        ConnectionConfig::new(
            self.driver_classname.as_deref().unwrap_or_default().trim(),
            self.connection_string.as_deref().unwrap_or_default().trim(),
            username,
            password,
        )
    }

    /// The select statement, trimmed; empty when unset.
    #[must_use]
    pub fn select(&self) -> &str {
        self.select_statement.as_deref().unwrap_or_default().trim()
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("driver_classname", &self.driver_classname)
            .field("connection_string", &self.connection_string)
            .field("sql_username", &self.sql_username)
            .field("sql_password", &self.sql_password.as_deref().map(mask_password))
            .field("sql_key", &self.sql_key)
            .field("select_statement", &self.select_statement)
            .field("pre_sql_statements", &self.pre_sql_statements)
            .finish()
    }
}
