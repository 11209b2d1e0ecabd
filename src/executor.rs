use crate::driver::DbConnection;
use crate::statement::Statement;

/// Run every pre-statement in order on `conn`.
///
/// A failing statement is logged and remembered, but the remaining ones
/// still run. Blank statements and `None` entries are skipped. Returns
/// `false` if any statement failed, `true` otherwise (including for an
/// empty list).
pub fn run_pre_statements(conn: &mut dyn DbConnection, statements: &[Option<Statement>]) -> bool {
    let mut success = true;
    for statement in statements.iter().flatten() {
        let Some(sql) = statement.trimmed() else {
            continue;
        };
        if let Err(err) = statement.execute(conn) {
            tracing::error!(
                kind = statement.kind(),
                sql,
                error = %err,
                "Failed to execute PRE {} statement",
                statement.kind()
            );
            success = false;
        }
    }
    success
}
