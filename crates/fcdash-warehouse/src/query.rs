//! Parameterized query values.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use ::duckdb::types::ToSqlOutput;
use ::duckdb::ToSql;
use serde::Serialize;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Display for SqlParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "'{value}'"),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> ::duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Self::Int(value) => value.to_sql(),
            Self::Text(value) => value.to_sql(),
        }
    }
}

/// A query template plus its bound parameters.
///
/// Two queries are equal when both the template text and the parameter tuple
/// are equal; no whitespace or case normalization happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlQuery {
    sql: Cow<'static, str>,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind the next positional parameter.
    #[must_use]
    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

impl Display for SqlQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let compact = self.sql.split_whitespace().collect::<Vec<_>>().join(" ");
        if compact.chars().count() > 96 {
            let head: String = compact.chars().take(96).collect();
            write!(f, "{head}…")?;
        } else {
            f.write_str(&compact)?;
        }

        if !self.params.is_empty() {
            let params = self
                .params
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " [{params}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_covers_template_and_params() {
        let alice = SqlQuery::new("SELECT * FROM t WHERE name = ?").bind("Alice");
        let bob = SqlQuery::new("SELECT * FROM t WHERE name = ?").bind("Bob");

        assert_ne!(alice, bob);
        assert_eq!(alice, SqlQuery::new("SELECT * FROM t WHERE name = ?").bind("Alice"));
    }

    #[test]
    fn whitespace_differences_are_distinct_queries() {
        assert_ne!(SqlQuery::new("SELECT 1"), SqlQuery::new("SELECT  1"));
    }

    #[test]
    fn display_is_single_line_with_params() {
        let query = SqlQuery::new("SELECT *\n  FROM t\n WHERE id = ?").bind(5_i64);
        assert_eq!(query.to_string(), "SELECT * FROM t WHERE id = ? [5]");
    }
}
