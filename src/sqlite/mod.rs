// SQLite backend - blocking rusqlite connection behind the `DbConnection` trait
//
// - config: driver identifier and connection-string handling
// - connection: auto-commit emulation and statement execution
// - query: result extraction and building

pub mod config;
pub mod connection;
pub mod query;

pub use config::SqliteDriver;
pub use connection::SqliteConnection;
pub use query::build_result_set;
