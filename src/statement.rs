use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::driver::DbConnection;
use crate::error::SqlPropsError;

/// A statement run before the selection query, inside the same transaction.
///
/// Deserializes from `{"kind": "dml" | "call", "sqlStatement": "..."}` and
/// parses from the CLI form `dml:<sql>` / `call:<sql>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    /// INSERT/UPDATE/DELETE (or DDL); the affected-row count is ignored.
    #[serde(rename = "dml", alias = "DataModification")]
    DataModification {
        #[serde(rename = "sqlStatement", default)]
        sql_statement: String,
    },
    /// Stored-procedure invocation; nothing is captured.
    #[serde(rename = "call", alias = "ProcedureCall")]
    ProcedureCall {
        #[serde(rename = "sqlStatement", default)]
        sql_statement: String,
    },
}

impl Statement {
    pub fn dml(sql: impl Into<String>) -> Self {
        Statement::DataModification {
            sql_statement: sql.into(),
        }
    }

    pub fn call(sql: impl Into<String>) -> Self {
        Statement::ProcedureCall {
            sql_statement: sql.into(),
        }
    }

    /// Raw, untrimmed statement text.
    #[must_use]
    pub fn sql_statement(&self) -> &str {
        match self {
            Statement::DataModification { sql_statement }
            | Statement::ProcedureCall { sql_statement } => sql_statement,
        }
    }

    /// Trimmed statement text, or `None` when there is nothing to run.
    #[must_use]
    pub fn trimmed(&self) -> Option<&str> {
        let sql = self.sql_statement().trim();
        if sql.is_empty() { None } else { Some(sql) }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::DataModification { .. } => "DML",
            Statement::ProcedureCall { .. } => "CALL",
        }
    }

    /// Run the statement on `conn`. Blank statements are a no-op.
    ///
    /// # Errors
    /// Returns the driver error when the statement fails.
    pub fn execute(&self, conn: &mut dyn DbConnection) -> Result<(), SqlPropsError> {
        let Some(sql) = self.trimmed() else {
            return Ok(());
        };
        match self {
            Statement::DataModification { .. } => {
                let affected = conn.execute_update(sql)?;
                tracing::debug!(%affected, sql, "PRE DML statement executed");
            }
            Statement::ProcedureCall { .. } => {
                conn.execute_call(sql)?;
                tracing::debug!(sql, "PRE CALL statement executed");
            }
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Statement::DataModification { .. } => "dml",
            Statement::ProcedureCall { .. } => "call",
        };
        write!(f, "{prefix}:{}", self.sql_statement())
    }
}

impl FromStr for Statement {
    type Err = SqlPropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, sql) = s.split_once(':').ok_or_else(|| {
            SqlPropsError::ConfigError(format!(
                "pre-statement '{s}' must look like dml:<sql> or call:<sql>"
            ))
        })?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "dml" => Ok(Statement::dml(sql)),
            "call" | "procedure" => Ok(Statement::call(sql)),
            other => Err(SqlPropsError::ConfigError(format!(
                "unknown pre-statement kind '{other}' (expected dml or call)"
            ))),
        }
    }
}
