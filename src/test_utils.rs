//! Helpers for integration tests that need a live database server.

/// Embedded `PostgreSQL` server management
pub mod postgres;
