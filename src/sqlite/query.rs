use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlPropsError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Read column `idx` of a row as a cell.
///
/// SQLite has no native boolean or timestamp storage class, so those arrive
/// as integers or text.
///
/// # Errors
/// Returns `SqlPropsError` if the value cannot be read.
pub fn cell_at(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlPropsError> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared query once and materialize all of its rows.
///
/// # Errors
/// Returns `SqlPropsError` if query execution or value extraction fails.
pub fn build_result_set(stmt: &mut Statement) -> Result<ResultSet, SqlPropsError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let cells = (0..col_count)
            .map(|idx| cell_at(row, idx))
            .collect::<Result<Vec<_>, _>>()?;
        result_set.add_row_values(cells);
    }

    Ok(result_set)
}
