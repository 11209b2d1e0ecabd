use crate::config::LoadConfig;
use crate::connection::open;
use crate::credentials::{CredentialResolver, NoCredentialStore};
use crate::driver::DriverRegistry;
use crate::error::SqlPropsError;
use crate::helpers::close_quietly;
use crate::mapping::{PropertyMapping, singular_plural};
use crate::publish::PropertyPublisher;
use crate::transaction::{TransactionOutcome, run_transaction};

/// Runs one complete load: validate, resolve credentials, open, transact, publish.
///
/// ```no_run
/// use indexmap::IndexMap;
/// use sql_props_loader::{LoadConfig, PropertyLoader};
///
/// # fn main() -> Result<(), sql_props_loader::SqlPropsError> {
/// let config = LoadConfig::from_path("load-props.json")?;
/// let mut props: IndexMap<String, Option<String>> = IndexMap::new();
/// PropertyLoader::new().load(&config, &mut props)?;
/// # Ok(())
/// # }
/// ```
pub struct PropertyLoader {
    registry: DriverRegistry,
    resolver: Box<dyn CredentialResolver>,
}

impl PropertyLoader {
    /// Built-in drivers, no credential store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: DriverRegistry::with_builtin_drivers(),
            resolver: Box::new(NoCredentialStore),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: DriverRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_credentials<R: CredentialResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Load properties as described by `config` and merge them into `publisher`.
    ///
    /// Nothing is published when the mapping is empty or on any error. The
    /// connection is closed on every path once it was opened.
    ///
    /// # Errors
    /// - `ConfigError` for missing parameters or unresolvable credentials
    /// - `DriverInit` if the driver cannot be found or initialized
    /// - `ConnectionError` if the connection cannot be opened
    /// - `PreStatementError` if any pre-statement failed (the transaction was rolled back)
    /// - `CommitError` if committing failed
    /// - whatever the publisher reports
    pub fn load(
        &self,
        config: &LoadConfig,
        publisher: &mut dyn PropertyPublisher,
    ) -> Result<PropertyMapping, SqlPropsError> {
        tracing::info!("Loading properties via SQL...");

        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "Cannot load properties");
            return Err(err);
        }

        let connection_config = config.connection_config(self.resolver.as_ref())?;

        let mut conn = open(&self.registry, &connection_config).inspect_err(|err| match err {
            SqlPropsError::DriverInit { .. } => {
                tracing::error!(error = %err, "Could not load database driver");
            }
            _ => tracing::error!(error = %err, "Cannot load properties: no database connection"),
        })?;

        let outcome = run_transaction(conn.as_mut(), &config.pre_sql_statements, config.select());
        close_quietly(conn);

        match outcome? {
            TransactionOutcome::Committed(properties) => {
                if !properties.is_empty() {
                    publisher.publish(&properties)?;
                    tracing::info!(
                        "Loaded {} {}",
                        properties.len(),
                        singular_plural(properties.len(), "property", "properties")
                    );
                }
                Ok(properties)
            }
            TransactionOutcome::RolledBack(reason) => Err(SqlPropsError::PreStatementError(reason)),
        }
    }
}

impl Default for PropertyLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot load with built-in drivers.
///
/// # Errors
/// See [`PropertyLoader::load`].
pub fn load_properties(
    config: &LoadConfig,
    resolver: impl CredentialResolver + 'static,
    publisher: &mut dyn PropertyPublisher,
) -> Result<PropertyMapping, SqlPropsError> {
    PropertyLoader::new()
        .with_credentials(resolver)
        .load(config, publisher)
}
