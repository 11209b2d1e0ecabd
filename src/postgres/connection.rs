use std::fmt;

use tokio::runtime::Runtime;
use tokio_postgres::Client;

use crate::driver::DbConnection;
use crate::error::SqlPropsError;
use crate::results::ResultSet;

use super::query::{build_result_set_from_statement, build_result_set_from_text, reads_natively};

/// A tokio-postgres client driven by its own current-thread runtime.
pub struct PostgresConnection {
    runtime: Runtime,
    client: Client,
    auto_commit: bool,
    in_transaction: bool,
}

impl PostgresConnection {
    pub(crate) fn new(runtime: Runtime, client: Client) -> Self {
        Self {
            runtime,
            client,
            auto_commit: true,
            in_transaction: false,
        }
    }

    fn batch(&mut self, sql: &str) -> Result<(), SqlPropsError> {
        self.runtime
            .block_on(self.client.batch_execute(sql))
            .map_err(SqlPropsError::PostgresError)
    }

    fn ensure_transaction(&mut self) -> Result<(), SqlPropsError> {
        if !self.auto_commit && !self.in_transaction {
            self.batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

impl DbConnection for PostgresConnection {
    fn auto_commit(&mut self) -> Result<bool, SqlPropsError> {
        Ok(self.auto_commit)
    }

    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<(), SqlPropsError> {
        if auto_commit && self.in_transaction {
            self.batch("COMMIT")?;
            self.in_transaction = false;
        }
        self.auto_commit = auto_commit;
        Ok(())
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64, SqlPropsError> {
        self.ensure_transaction()?;
        self.runtime
            .block_on(self.client.execute(sql, &[]))
            .map_err(|e| SqlPropsError::ExecutionError(format!("postgres execute error: {e}")))
    }

    fn execute_call(&mut self, sql: &str) -> Result<(), SqlPropsError> {
        self.ensure_transaction()?;
        self.runtime
            .block_on(self.client.execute(sql, &[]))
            .map(|_| ())
            .map_err(|e| SqlPropsError::ExecutionError(format!("postgres call error: {e}")))
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet, SqlPropsError> {
        self.ensure_transaction()?;
        let client = &self.client;
        self.runtime.block_on(async {
            let stmt = client.prepare(sql).await.map_err(|e| {
                SqlPropsError::ExecutionError(format!("postgres prepare error: {e}"))
            })?;
            if stmt.columns().iter().all(|col| reads_natively(col.type_())) {
                let rows = client.query(&stmt, &[]).await.map_err(|e| {
                    SqlPropsError::ExecutionError(format!("postgres select error: {e}"))
                })?;
                return build_result_set_from_statement(&stmt, &rows);
            }
            // prepare rejects multi-statement text, so this still runs a single query
            let messages = client.simple_query(sql).await.map_err(|e| {
                SqlPropsError::ExecutionError(format!("postgres select error: {e}"))
            })?;
            build_result_set_from_text(&stmt, &messages)
        })
    }

    fn commit(&mut self) -> Result<(), SqlPropsError> {
        if self.in_transaction {
            self.batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlPropsError> {
        if self.in_transaction {
            self.in_transaction = false;
            self.batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), SqlPropsError> {
        let PostgresConnection {
            runtime, client, ..
        } = *self;
        drop(client);
        runtime.shutdown_background();
        Ok(())
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("auto_commit", &self.auto_commit)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
