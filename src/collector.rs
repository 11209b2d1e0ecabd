use crate::driver::DbConnection;
use crate::error::SqlPropsError;
use crate::mapping::PropertyMapping;
use crate::results::ResultSet;

/// Run the selection query and turn its rows into a property mapping.
///
/// Column 1 is the property name, column 2 its value. Rows with a NULL or
/// blank name are skipped; a NULL value is kept as `None`. Zero rows give an
/// empty mapping.
///
/// # Errors
/// Returns `SqlPropsError::ConfigError` for a blank statement and
/// `SqlPropsError::SelectionError` if the query fails or selects fewer than
/// two columns.
pub fn collect(
    conn: &mut dyn DbConnection,
    select_statement: &str,
) -> Result<PropertyMapping, SqlPropsError> {
    let sql = select_statement.trim();
    if sql.is_empty() {
        return Err(SqlPropsError::ConfigError(
            "select statement is required".to_string(),
        ));
    }

    let result_set = conn
        .query(sql)
        .map_err(|e| SqlPropsError::SelectionError(format!("loading failed - {e}")))?;
    mapping_from_result_set(&result_set)
}

/// Build the mapping from an already materialized result.
///
/// # Errors
/// Returns `SqlPropsError::SelectionError` if rows are present but fewer than
/// two columns were selected.
pub fn mapping_from_result_set(result_set: &ResultSet) -> Result<PropertyMapping, SqlPropsError> {
    let mut properties = PropertyMapping::new();
    if result_set.is_empty() {
        tracing::info!("No properties found");
        return Ok(properties);
    }
    if result_set.column_count() < 2 {
        return Err(SqlPropsError::SelectionError(
            "not enough columns selected (need at least two)".to_string(),
        ));
    }

    for row in &result_set.results {
        let Some(name) = row.get_by_index(0).and_then(|v| v.to_property_string()) else {
            continue;
        };
        if name.trim().is_empty() {
            continue;
        }
        let value = row.get_by_index(1).and_then(|v| v.to_property_string());
        properties.insert(name, value);
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::RowValues;

    fn result_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
        let mut rs = ResultSet::with_capacity(rows.len());
        rs.set_column_names(Arc::new(columns.iter().map(|c| (*c).to_string()).collect()));
        for row in rows {
            rs.add_row_values(row);
        }
        rs
    }

    fn text(s: &str) -> RowValues {
        RowValues::Text(s.to_string())
    }

    #[test]
    fn later_duplicates_overwrite_in_place() {
        let rs = result_set(
            &["name", "value"],
            vec![
                vec![text("a"), text("1")],
                vec![text("b"), text("2")],
                vec![text("a"), text("3")],
            ],
        );
        let mapping = mapping_from_result_set(&rs).unwrap();
        let items: Vec<_> = mapping.iter().collect();
        assert_eq!(items, vec![("a", Some("3")), ("b", Some("2"))]);
    }

    #[test]
    fn null_and_blank_names_are_skipped() {
        let rs = result_set(
            &["name", "value"],
            vec![
                vec![RowValues::Null, text("lost")],
                vec![text("  "), text("lost too")],
                vec![text("kept"), RowValues::Null],
                vec![RowValues::Int(7), RowValues::Float(1.5)],
            ],
        );
        let mapping = mapping_from_result_set(&rs).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("kept"), Some(None));
        assert_eq!(mapping.get("7"), Some(Some("1.5")));
    }

    #[test]
    fn single_column_is_rejected_only_when_rows_exist() {
        let empty = result_set(&["name"], vec![]);
        assert!(mapping_from_result_set(&empty).unwrap().is_empty());

        let one_col = result_set(&["name"], vec![vec![text("a")]]);
        assert!(matches!(
            mapping_from_result_set(&one_col),
            Err(SqlPropsError::SelectionError(_))
        ));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rs = result_set(
            &["name", "value", "comment"],
            vec![vec![text("k"), text("v"), text("ignored")]],
        );
        let mapping = mapping_from_result_set(&rs).unwrap();
        assert_eq!(mapping.get("k"), Some(Some("v")));
    }
}
