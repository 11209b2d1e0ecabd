use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values read back from a database row.
///
/// Every backend converts its native column types into this enum so the
/// property collector never has to branch on driver types:
/// ```rust
/// use sql_props_loader::RowValues;
///
/// assert_eq!(RowValues::Int(42).to_string(), "42");
/// assert!(RowValues::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Textual form of a non-null value, `None` for NULL.
    #[must_use]
    pub fn to_property_string(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for RowValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValues::Int(i) => write!(f, "{i}"),
            // whole values keep their fraction: 1.0 renders as "1.0", not "1"
            RowValues::Float(v) => write!(f, "{v:?}"),
            RowValues::Text(s) => f.write_str(s),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Timestamp(dt) => write!(f, "{}", dt.format("%F %T%.f")),
            RowValues::Null => f.write_str("null"),
            RowValues::JSON(jval) => write!(f, "{jval}"),
            RowValues::Blob(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}
