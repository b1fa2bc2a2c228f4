//! # fcdash Warehouse
//!
//! Warehouse access layer for the FC Online ranking dashboard.
//!
//! ## Overview
//!
//! - 🔌 **One connection per process**: [`ConnectionManager`] opens the
//!   warehouse lazily and keeps the handle for the life of the process
//! - 🔒 **Bound parameters**: [`SqlQuery`] carries `?` placeholders plus a
//!   parameter tuple; user input is never interpolated into SQL text
//! - 📊 **Tabular results**: [`QueryResult`] keeps column order and row order
//!   exactly as the warehouse returned them
//! - 🦆 **Local or remote**: a local `DuckDB` file, or a Postgres-wire
//!   warehouse (Redshift) reached over `sqlx`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fcdash_warehouse::{SqlQuery, Warehouse, WarehouseConfig};
//!
//! let warehouse = Warehouse::new(WarehouseConfig::local("fc.duckdb"));
//! let query = SqlQuery::new(
//!     "SELECT gamer_nickname, team_worth FROM analytics.ranking_info WHERE gamer_nickname = ?",
//! )
//! .bind("DNFS");
//!
//! let result = warehouse.execute(&query)?;
//! println!("found {} rows", result.row_count);
//! # Ok::<(), fcdash_warehouse::WarehouseError>(())
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `analytics.ranking_info` | Ranker leaderboard rows |
//! | `analytics.division_info` | Division id to name |
//! | `analytics.match_info` | Player usage per ranker match |
//! | `analytics.player_info` | Player names by `spid` |
//! | `analytics.season_info` | Season names and badge images |
//! | `analytics.position_info` | Detailed position names |
//! | `analytics.player_review_info` | Reviews with sentiment predictions |

pub mod config;
pub mod connection;
pub mod models;
pub mod query;
mod remote;
pub mod schema;

use std::sync::Arc;

use ::duckdb::types::Value as DuckValue;
use ::duckdb::{Connection, Statement, ToSql};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

pub use config::{RemoteWarehouse, WarehouseConfig, WarehouseTarget};
use connection::Session;

pub use connection::ConnectionManager;
pub use models::{QueryResult, SqlColumn};
pub use query::{SqlParam, SqlQuery};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The warehouse could not be reached.
    #[error("warehouse connection failed: {0}")]
    Connection(String),

    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// Error reported by the remote Postgres-wire warehouse.
    #[error(transparent)]
    Postgres(sqlx::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Query was rejected due to policy violation.
    #[error("query rejected: {0}")]
    QueryRejected(String),
}

impl WarehouseError {
    /// Whether the failure happened before any query could run.
    pub const fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// The warehouse interface used by the dashboard.
///
/// Cloning is cheap; every clone shares the same [`ConnectionManager`].
#[derive(Clone)]
pub struct Warehouse {
    manager: Arc<ConnectionManager>,
}

impl Warehouse {
    /// Create a warehouse handle. Nothing is opened until the first query.
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            manager: Arc::new(ConnectionManager::new(config)),
        }
    }

    /// The connection manager shared by every clone of this handle.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Execute a parameterized read query and read every row.
    ///
    /// # Errors
    /// Returns [`WarehouseError::Connection`] when the warehouse is
    /// unreachable, [`WarehouseError::QueryRejected`] for non-read statements,
    /// or the engine error for malformed SQL.
    pub fn execute(&self, query: &SqlQuery) -> Result<QueryResult, WarehouseError> {
        let sql = normalize_sql(query.sql())?;
        enforce_read_only_query(sql)?;

        debug!(%query, "executing warehouse query");
        self.select(sql, query.params())
    }

    /// Execute ad-hoc SQL text that carries no parameters.
    ///
    /// # Security
    /// Only single SELECT/CTE statements are accepted.
    pub fn execute_read_only(&self, sql: &str) -> Result<QueryResult, WarehouseError> {
        let sql = normalize_sql(sql)?;
        enforce_read_only_query(sql)?;
        self.select(sql, &[])
    }

    fn reject_remote(&self, reason: &str) -> Result<(), WarehouseError> {
        match self.manager.config().target() {
            WarehouseTarget::Remote(_) => Err(WarehouseError::QueryRejected(reason.to_string())),
            _ => Ok(()),
        }
    }

    fn select(&self, sql: &str, params: &[SqlParam]) -> Result<QueryResult, WarehouseError> {
        self.manager.with_session(|session| match session {
            Session::Local(connection) => execute_select_query(connection, sql, params),
            Session::Remote(remote) => remote.select(sql, params),
        })
    }

    /// Run a write script (schema setup, local fixtures).
    pub fn execute_script(&self, sql: &str) -> Result<(), WarehouseError> {
        let sql = normalize_sql(sql)?;
        self.reject_remote("scripts run against local warehouses only")?;
        self.manager.with_connection(|connection| {
            connection.execute_batch(sql)?;
            Ok(())
        })
    }

    /// Create the `analytics` tables in a local warehouse.
    pub fn init_schema(&self) -> Result<(), WarehouseError> {
        self.reject_remote("remote warehouses are read-only; schema setup is local only")?;

        self.manager.with_connection(|connection| {
            schema::apply_migrations(connection)?;
            Ok(())
        })
    }
}

/// Execute a SELECT query and collect results.
fn execute_select_query(
    connection: &Connection,
    sql: &str,
    params: &[SqlParam],
) -> Result<QueryResult, WarehouseError> {
    let bound: Vec<&dyn ToSql> = params.iter().map(|param| param as &dyn ToSql).collect();

    let mut statement = connection.prepare(sql)?;
    let mut rows_cursor = statement.query(bound.as_slice())?;

    // Column metadata is read from the executed statement behind the cursor.
    let columns = match rows_cursor.as_ref() {
        Some(executed) => read_columns(executed)?,
        None => Vec::new(),
    };
    let column_count = columns.len();

    let mut rows = Vec::new();
    while let Some(row) = rows_cursor.next()? {
        rows.push(read_row(row, column_count)?);
    }

    Ok(QueryResult::new(columns, rows))
}

fn read_columns(statement: &Statement<'_>) -> Result<Vec<SqlColumn>, ::duckdb::Error> {
    (0..statement.column_count())
        .map(|index| {
            Ok(SqlColumn {
                name: statement.column_name(index)?.to_string(),
                r#type: statement.column_type(index).to_string(),
            })
        })
        .collect()
}

/// Read a single row from the result set.
fn read_row(row: &::duckdb::Row<'_>, column_count: usize) -> Result<Vec<Value>, ::duckdb::Error> {
    let mut output = Vec::with_capacity(column_count);
    for index in 0..column_count {
        let value: DuckValue = row.get(index)?;
        output.push(to_json_value(value));
    }
    Ok(output)
}

/// Convert a `DuckDB` value to a JSON value.
fn to_json_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(value) => Value::Bool(value),
        DuckValue::TinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::SmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::Int(value) => Value::Number(Number::from(value)),
        DuckValue::BigInt(value) => Value::Number(Number::from(value)),
        DuckValue::HugeInt(value) => i64::try_from(value)
            .map(|value| Value::Number(Number::from(value)))
            .unwrap_or_else(|_| Value::String(value.to_string())),
        DuckValue::UTinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::USmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::UInt(value) => Value::Number(Number::from(value)),
        DuckValue::UBigInt(value) => Value::Number(Number::from(value)),
        DuckValue::Float(value) => number_from_f64(f64::from(value)),
        DuckValue::Double(value) => number_from_f64(value),
        DuckValue::Decimal(value) => value
            .to_string()
            .parse::<f64>()
            .map(number_from_f64)
            .unwrap_or(Value::Null),
        DuckValue::Text(value) => Value::String(value),
        DuckValue::Blob(value) => Value::String(hex::encode(value)),
        other => Value::String(format!("{other:?}")),
    }
}

/// Convert an f64 to a JSON number, returning Null for NaN/Inf.
fn number_from_f64(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Normalize a SQL query string.
fn normalize_sql(sql: &str) -> Result<&str, WarehouseError> {
    let normalized = sql.trim();
    if normalized.is_empty() {
        return Err(WarehouseError::QueryRejected(String::from(
            "query must not be empty",
        )));
    }
    Ok(normalized.trim_end_matches(';').trim())
}

/// Enforce that a query is read-only (SELECT/CTE only).
fn enforce_read_only_query(sql: &str) -> Result<(), WarehouseError> {
    if !is_select_like(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "only SELECT/CTE queries are accepted",
        )));
    }
    if has_multiple_statements(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "multiple SQL statements are not allowed",
        )));
    }
    Ok(())
}

/// Check if a SQL query starts with a SELECT-like keyword.
fn is_select_like(sql: &str) -> bool {
    let first_keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    matches!(
        first_keyword.as_str(),
        "SELECT" | "WITH" | "EXPLAIN" | "SHOW" | "DESCRIBE"
    )
}

/// Check if a SQL string contains multiple statements.
fn has_multiple_statements(sql: &str) -> bool {
    sql.split(';')
        .filter(|part| !part.trim().is_empty())
        .count()
        > 1
}
