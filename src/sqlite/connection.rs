use std::fmt;

use crate::driver::DbConnection;
use crate::error::SqlPropsError;
use crate::results::ResultSet;

use super::query::build_result_set;

/// A single rusqlite connection with JDBC-style auto-commit.
///
/// SQLite itself is in auto-commit mode whenever no transaction is open, so
/// turning auto-commit off is emulated by issuing `BEGIN` lazily before the
/// next statement.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
    auto_commit: bool,
}

impl SqliteConnection {
    #[must_use]
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn,
            auto_commit: true,
        }
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn ensure_transaction(&mut self) -> Result<(), SqlPropsError> {
        if !self.auto_commit && !self.in_transaction() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl DbConnection for SqliteConnection {
    fn auto_commit(&mut self) -> Result<bool, SqlPropsError> {
        Ok(self.auto_commit)
    }

    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<(), SqlPropsError> {
        if auto_commit && self.in_transaction() {
            self.conn.execute_batch("COMMIT")?;
        }
        self.auto_commit = auto_commit;
        Ok(())
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64, SqlPropsError> {
        self.ensure_transaction()?;
        let mut stmt = self.conn.prepare(sql)?;
        let affected = stmt.execute([])?;
        Ok(affected as u64)
    }

    fn execute_call(&mut self, sql: &str) -> Result<(), SqlPropsError> {
        self.ensure_transaction()?;
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet, SqlPropsError> {
        self.ensure_transaction()?;
        let mut stmt = self.conn.prepare(sql)?;
        build_result_set(&mut stmt)
    }

    fn commit(&mut self) -> Result<(), SqlPropsError> {
        if self.in_transaction() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlPropsError> {
        if self.in_transaction() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), SqlPropsError> {
        self.conn
            .close()
            .map_err(|(_, err)| SqlPropsError::SqliteError(err))
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("auto_commit", &self.auto_commit)
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> SqliteConnection {
        SqliteConnection::new(rusqlite::Connection::open_in_memory().unwrap())
    }

    #[test]
    fn begin_is_deferred_until_first_statement() {
        let mut conn = memory();
        conn.set_auto_commit(false).unwrap();
        assert!(!conn.in_transaction());
        conn.execute_update("CREATE TABLE t (x int)").unwrap();
        assert!(conn.in_transaction());
        conn.commit().unwrap();
        assert!(!conn.in_transaction());
    }

    #[test]
    fn rollback_discards_pending_work() {
        let mut conn = memory();
        conn.execute_update("CREATE TABLE t (x int)").unwrap();
        conn.set_auto_commit(false).unwrap();
        assert_eq!(conn.execute_update("INSERT INTO t VALUES (1), (2)").unwrap(), 2);
        conn.rollback().unwrap();
        let rs = conn.query("SELECT count(*) FROM t").unwrap();
        assert_eq!(rs.results[0].get_by_index(0), Some(&crate::RowValues::Int(0)));
    }

    #[test]
    fn enabling_auto_commit_commits_open_transaction() {
        let mut conn = memory();
        conn.execute_update("CREATE TABLE t (x int)").unwrap();
        conn.set_auto_commit(false).unwrap();
        conn.execute_update("INSERT INTO t VALUES (1)").unwrap();
        conn.set_auto_commit(true).unwrap();
        assert!(!conn.in_transaction());
        conn.rollback().unwrap();
        let rs = conn.query("SELECT count(*) FROM t").unwrap();
        assert_eq!(rs.results[0].get_by_index(0), Some(&crate::RowValues::Int(1)));
    }

    #[test]
    fn call_accepts_statements_returning_rows() {
        let mut conn = memory();
        conn.execute_call("SELECT 1").unwrap();
        assert!(conn.execute_call("CALL refresh_props()").is_err());
    }
}
