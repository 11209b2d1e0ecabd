//! Load build properties from a relational database.
//!
//! One invocation opens a single connection, runs optional pre-statements
//! and a selection query inside one transaction, and merges the selected
//! `(name, value)` rows into a host property set.
//!
//! ```rust
//! use indexmap::IndexMap;
//! use sql_props_loader::{LoadConfig, PropertyLoader, Statement};
//!
//! let config = LoadConfig {
//!     driver_classname: Some("sqlite".into()),
//!     connection_string: Some(":memory:".into()),
//!     sql_username: Some("build".into()),
//!     sql_password: Some("unused".into()),
//!     select_statement: Some("SELECT name, value FROM props ORDER BY name".into()),
//!     pre_sql_statements: vec![
//!         Some(Statement::dml("CREATE TABLE props (name text, value text)")),
//!         Some(Statement::dml("INSERT INTO props VALUES ('app.version', '1.4.2')")),
//!     ],
//!     ..LoadConfig::default()
//! };
//!
//! let mut props: IndexMap<String, Option<String>> = IndexMap::new();
//! PropertyLoader::new().load(&config, &mut props).unwrap();
//! assert_eq!(props["app.version"].as_deref(), Some("1.4.2"));
//! ```

pub mod collector;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod driver;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod loader;
pub mod mapping;
pub mod properties;
pub mod publish;
pub mod results;
pub mod statement;
pub mod transaction;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use config::LoadConfig;
pub use connection::ConnectionConfig;
pub use credentials::{
    CredentialResolver, Credentials, NoCredentialStore, SettingsFile, StaticCredentials,
};
pub use driver::{DbConnection, Driver, DriverRegistry};
pub use error::SqlPropsError;
pub use loader::{PropertyLoader, load_properties};
pub use mapping::PropertyMapping;
pub use publish::{PropertiesFilePublisher, PropertyPublisher, WriterPublisher};
pub use results::{DbRow, ResultSet};
pub use statement::Statement;
pub use transaction::{TransactionController, TransactionOutcome, TxState};
pub use types::RowValues;
