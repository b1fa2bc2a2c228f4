use serde::Serialize;
use serde_json::Value;

/// Column metadata for query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlColumn {
    /// Column name.
    pub name: String,
    /// Column data type.
    #[serde(rename = "type")]
    pub r#type: String,
}

impl SqlColumn {
    /// A column whose type is not known.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: String::new(),
        }
    }
}

/// Result of a SQL query execution.
///
/// Columns keep the order reported by the warehouse and rows keep the order
/// the warehouse returned them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Column definitions.
    pub columns: Vec<SqlColumn>,
    /// Row data as JSON values.
    pub rows: Vec<Vec<Value>>,
    /// Number of rows returned.
    pub row_count: usize,
}

impl QueryResult {
    pub fn new(columns: Vec<SqlColumn>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            row_count: rows.len(),
            rows,
        }
    }

    /// Build a result from bare column names.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self::new(columns.iter().copied().map(SqlColumn::named).collect(), rows)
    }

    /// A successful query that returned zero rows is not an error, but it has
    /// to be checked before indexing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Text rendering of a cell; `None` for SQL NULL or a missing cell.
    pub fn text(&self, row: usize, column: &str) -> Option<String> {
        match self.value(row, column)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn int(&self, row: usize, column: &str) -> Option<i64> {
        match self.value(row, column)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.round() as i64)),
            Value::String(text) => text.trim().parse().ok(),
            Value::Bool(flag) => Some(i64::from(*flag)),
            _ => None,
        }
    }

    pub fn float(&self, row: usize, column: &str) -> Option<f64> {
        match self.value(row, column)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}
