//! The single transaction wrapped around pre-statements and selection.
//!
//! ```text
//! Start -> PreStatementsRun -> Collecting        -> Committing  -> Done
//!                           \-> SkippedCollecting -> RollingBack -> Done
//! ```
//!
//! Only pre-statement failures lead to a rollback. A failing selection query
//! is logged and yields an empty mapping, and the transaction still commits.

use crate::collector::collect;
use crate::driver::DbConnection;
use crate::error::SqlPropsError;
use crate::executor::run_pre_statements;
use crate::mapping::PropertyMapping;
use crate::statement::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Start,
    PreStatementsRun,
    Collecting,
    SkippedCollecting,
    Committing,
    RollingBack,
    Done,
}

/// Terminal result of a controller run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed(PropertyMapping),
    RolledBack(String),
}

impl TransactionOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Drives one transaction on a borrowed connection.
///
/// The connection stays owned by the caller, who closes it afterwards.
pub struct TransactionController<'c> {
    conn: &'c mut dyn DbConnection,
    state: TxState,
    prior_auto_commit: bool,
}

impl<'c> TransactionController<'c> {
    pub fn new(conn: &'c mut dyn DbConnection) -> Self {
        Self {
            conn,
            state: TxState::Start,
            prior_auto_commit: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Auto-commit flag found on the connection when the run started.
    #[must_use]
    pub fn prior_auto_commit(&self) -> bool {
        self.prior_auto_commit
    }

    fn transition(&mut self, next: TxState) {
        tracing::trace!(from = ?self.state, to = ?next, "transaction state");
        self.state = next;
    }

    /// Unreadable state counts as auto-commit on.
    fn read_auto_commit(&mut self) -> bool {
        self.conn.auto_commit().unwrap_or_else(|err| {
            tracing::debug!(error = %err, "could not read auto-commit state, assuming on");
            true
        })
    }

    fn change_auto_commit(&mut self, auto_commit: bool) {
        if let Err(err) = self.conn.set_auto_commit(auto_commit) {
            tracing::debug!(auto_commit, error = %err, "ignoring failure to change auto-commit");
        }
    }

    /// Run pre-statements and, when they all succeed, the selection query,
    /// then commit or roll back.
    ///
    /// # Errors
    /// Returns `SqlPropsError::CommitError` if the commit itself fails. A
    /// pre-statement failure is not an error here; it is reported as
    /// `TransactionOutcome::RolledBack`.
    pub fn run(
        &mut self,
        pre_statements: &[Option<Statement>],
        select_statement: &str,
    ) -> Result<TransactionOutcome, SqlPropsError> {
        self.prior_auto_commit = self.read_auto_commit();
        if self.prior_auto_commit {
            self.change_auto_commit(false);
        }

        self.transition(TxState::PreStatementsRun);
        let pre_success = run_pre_statements(self.conn, pre_statements);

        let properties = if pre_success {
            self.transition(TxState::Collecting);
            collect(self.conn, select_statement).unwrap_or_else(|err| {
                tracing::error!(error = %err, "Cannot load properties");
                PropertyMapping::new()
            })
        } else {
            self.transition(TxState::SkippedCollecting);
            tracing::info!("PRE statements failed, so no properties will be selected");
            PropertyMapping::new()
        };

        if pre_success {
            self.transition(TxState::Committing);
            let committed = self.conn.commit();
            self.change_auto_commit(true);
            if let Err(err) = committed {
                tracing::error!(error = %err, "Failed to commit transaction");
                self.transition(TxState::Done);
                return Err(SqlPropsError::CommitError(err.to_string()));
            }
            if !self.prior_auto_commit {
                self.change_auto_commit(false);
            }
            self.transition(TxState::Done);
            Ok(TransactionOutcome::Committed(properties))
        } else {
            self.transition(TxState::RollingBack);
            if let Err(err) = self.conn.rollback() {
                tracing::error!(error = %err, "Failed to rollback transaction");
            }
            self.transition(TxState::Done);
            Ok(TransactionOutcome::RolledBack(
                "one or more PRE statements failed".to_string(),
            ))
        }
    }
}

/// Convenience wrapper running a fresh controller on `conn`.
///
/// # Errors
/// See [`TransactionController::run`].
pub fn run_transaction(
    conn: &mut dyn DbConnection,
    pre_statements: &[Option<Statement>],
    select_statement: &str,
) -> Result<TransactionOutcome, SqlPropsError> {
    TransactionController::new(conn).run(pre_statements, select_statement)
}
