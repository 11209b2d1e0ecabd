// PostgreSQL backend - tokio-postgres behind a blocking `DbConnection`
//
// - config: driver identifier, connection-string parsing and connect
// - connection: auto-commit emulation and statement execution
// - query: result extraction and building

pub mod config;
pub mod connection;
pub mod query;

pub use config::PostgresDriver;
pub use connection::PostgresConnection;
pub use query::build_result_set_from_statement;
