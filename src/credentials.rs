//! Credential lookup for `sql_key` secret-store identifiers.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::SqlPropsError;
use crate::helpers::mask_password;

/// A username/password pair.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &mask_password(&self.password))
            .finish()
    }
}

/// Host-side secret store.
pub trait CredentialResolver {
    /// Look up the credentials stored under `id`.
    ///
    /// # Errors
    /// Returns `SqlPropsError` if `id` is unknown or the store cannot be read.
    fn resolve_credential(&self, id: &str) -> Result<Credentials, SqlPropsError>;
}

impl<R: CredentialResolver + ?Sized> CredentialResolver for Box<R> {
    fn resolve_credential(&self, id: &str) -> Result<Credentials, SqlPropsError> {
        (**self).resolve_credential(id)
    }
}

/// Resolver for hosts without a secret store; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentialStore;

impl CredentialResolver for NoCredentialStore {
    fn resolve_credential(&self, id: &str) -> Result<Credentials, SqlPropsError> {
        Err(SqlPropsError::ConfigError(format!(
            "no credential store configured to resolve '{id}'"
        )))
    }
}

/// In-memory resolver, handy for embedding hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, Credentials>,
}

impl StaticCredentials {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, credentials: Credentials) -> Self {
        self.entries.insert(id.into(), credentials);
        self
    }
}

impl CredentialResolver for StaticCredentials {
    fn resolve_credential(&self, id: &str) -> Result<Credentials, SqlPropsError> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| SqlPropsError::ConfigError(format!("no server entry '{id}'")))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ServerEntry {
    id: String,
    #[serde(flatten)]
    credentials: Credentials,
}

/// Settings file holding server entries, looked up by id.
///
/// ```json
/// { "servers": [ { "id": "build-db", "username": "ci", "password": "..." } ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    servers: Vec<ServerEntry>,
}

impl SettingsFile {
    /// # Errors
    /// Returns `SqlPropsError` if the file cannot be read or is not valid JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SqlPropsError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// # Errors
    /// Returns `SqlPropsError::Json` if `raw` is not a valid settings document.
    pub fn from_json(raw: &str) -> Result<Self, SqlPropsError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl CredentialResolver for SettingsFile {
    fn resolve_credential(&self, id: &str) -> Result<Credentials, SqlPropsError> {
        self.servers
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.credentials.clone())
            .ok_or_else(|| SqlPropsError::ConfigError(format!("no server entry '{id}'")))
    }
}
