use crate::types::RowValues;

/// A row from a database query result, values in select-list order.
#[derive(Debug, Clone)]
pub struct DbRow {
    pub values: Vec<RowValues>,
}

impl DbRow {
    #[must_use]
    pub fn new(values: Vec<RowValues>) -> Self {
        Self { values }
    }

    /// Get a value from the row by zero-based column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }
}
