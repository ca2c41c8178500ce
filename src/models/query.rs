//! Statement parameter and result models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A typed SQL value, used both as a bind parameter and as input to
/// [`Quoter::value`](crate::quoter::Quoter::value).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Point in time, UTC
    Timestamp(DateTime<Utc>),
    /// JSON document
    Json(JsonValue),
}

impl SqlValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Json(_) => "json",
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExecResult {
    pub rows_affected: u64,
}

/// Metadata of a statement prepared on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedStatement {
    pub sql: String,
    /// Result column names, in order. Empty for statements without a result set.
    pub columns: Vec<String>,
}

impl PreparedStatement {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_types() {
        assert!(SqlValue::Null.is_null());
        assert!(!SqlValue::Bool(true).is_null());
        assert_eq!(SqlValue::Int(42).type_name(), "int");
        assert_eq!(SqlValue::from("hello").type_name(), "text");
        assert_eq!(SqlValue::Json(serde_json::json!({})).type_name(), "json");
    }

    #[test]
    fn test_sql_value_from_option() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(7)), SqlValue::Int(7));
    }

    #[test]
    fn test_sql_value_serializes_untagged() {
        let json = serde_json::to_value(vec![
            SqlValue::Null,
            SqlValue::Int(1),
            SqlValue::from("a"),
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([null, 1, "a"]));
    }

    #[test]
    fn test_prepared_statement_columns() {
        let stmt = PreparedStatement {
            sql: "SELECT id, name FROM t".to_string(),
            columns: vec!["id".to_string(), "name".to_string()],
        };
        assert_eq!(stmt.column_count(), 2);
    }
}
