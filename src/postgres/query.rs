use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{SimpleQueryMessage, Statement};

use crate::error::SqlPropsError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Whether [`postgres_extract_value`] can decode columns of this type.
///
/// Anything else (`numeric`, `date`, `uuid`, `interval`, `inet`, enums, ...)
/// is read in the server's text form instead.
#[must_use]
pub fn reads_natively(ty: &Type) -> bool {
    matches!(
        ty.name(),
        "int2"
            | "int4"
            | "int8"
            | "float4"
            | "float8"
            | "bool"
            | "timestamp"
            | "timestamptz"
            | "json"
            | "jsonb"
            | "bytea"
    ) || <String as FromSql>::accepts(ty)
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// Only valid for columns where [`reads_natively`] holds.
///
/// # Errors
/// Returns `SqlPropsError` if the column cannot be read as its declared type.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, SqlPropsError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            // widen through the shortest decimal form so 1.1 stays 1.1
            Ok(val.map_or(RowValues::Null, |v| {
                RowValues::Float(v.to_string().parse().unwrap_or(f64::from(v)))
            }))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "timestamptz" => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc())))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        other => {
            // text, varchar, bpchar, name and friends
            let val: Option<String> = row.try_get(idx).map_err(|e| {
                SqlPropsError::ExecutionError(format!(
                    "column {} of type {other} is not readable as text: {e}",
                    idx + 1
                ))
            })?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, SqlPropsError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Convert one value of the text protocol, using the column type reported by
/// `prepare` to keep numbers and booleans typed.
#[must_use]
pub fn text_cell(ty: &Type, raw: Option<&str>) -> RowValues {
    let Some(raw) = raw else {
        return RowValues::Null;
    };
    let text = || RowValues::Text(raw.to_string());
    match ty.name() {
        "bool" => RowValues::Bool(raw == "t"),
        "int2" | "int4" | "int8" => raw.parse().map_or_else(|_| text(), RowValues::Int),
        "float4" | "float8" => raw.parse().map_or_else(|_| text(), RowValues::Float),
        _ => text(),
    }
}

/// Build a result set from `simple_query` output, named and typed after `stmt`.
///
/// # Errors
/// Returns `SqlPropsError::PostgresError` if a row has fewer columns than `stmt`.
pub fn build_result_set_from_text(
    stmt: &Statement,
    messages: &[SimpleQueryMessage],
) -> Result<ResultSet, SqlPropsError> {
    let columns = stmt.columns();
    let column_names: Vec<String> = columns.iter().map(|col| col.name().to_string()).collect();

    let mut result_set = ResultSet::with_capacity(messages.len());
    result_set.set_column_names(Arc::new(column_names));

    for message in messages {
        let SimpleQueryMessage::Row(row) = message else {
            continue;
        };
        let cells = columns
            .iter()
            .enumerate()
            .map(|(idx, col)| -> Result<RowValues, SqlPropsError> {
                Ok(text_cell(col.type_(), row.try_get(idx)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        result_set.add_row_values(cells);
    }

    Ok(result_set)
}
