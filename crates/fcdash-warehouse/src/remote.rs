//! Remote Postgres-wire warehouse (Redshift) over `sqlx`.
//!
//! The dashboard reads synchronously, so the session owns a single-threaded
//! tokio runtime and drives each query to completion on it. Callers must not
//! be on an async worker thread; the web and CLI surfaces use
//! `spawn_blocking`.

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgValueFormat, PgValueRef};
use sqlx::{Column, ConnectOptions, Executor, Row, Statement, TypeInfo, ValueRef};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::RemoteWarehouse;
use crate::models::{QueryResult, SqlColumn};
use crate::query::SqlParam;
use crate::{number_from_f64, WarehouseError};

/// Upper bound on establishing the remote connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const NUMERIC_NEGATIVE: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;

/// One open connection to the remote warehouse plus the runtime it runs on.
pub(crate) struct RemoteSession {
    connection: PgConnection,
    runtime: Option<Runtime>,
}

impl RemoteSession {
    /// Connect with the resolved parameters.
    pub(crate) fn connect(remote: &RemoteWarehouse) -> Result<Self, sqlx::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let options = connect_options(remote);
        let connection = runtime.block_on(async {
            match tokio::time::timeout(CONNECT_TIMEOUT, options.connect()).await {
                Ok(connected) => connected,
                Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no answer within {}s", CONNECT_TIMEOUT.as_secs()),
                ))),
            }
        })?;

        Ok(Self {
            connection,
            runtime: Some(runtime),
        })
    }

    /// Run one read query with `?` placeholders bound in order.
    pub(crate) fn select(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<QueryResult, WarehouseError> {
        let Self {
            connection,
            runtime,
        } = self;
        let runtime = runtime
            .as_ref()
            .ok_or_else(|| WarehouseError::Connection(String::from("remote session closed")))?;

        let sql = numbered_placeholders(sql);
        let (columns, rows) = runtime
            .block_on(async {
                let statement = (&mut *connection).prepare(sql.as_str()).await?;
                let columns: Vec<SqlColumn> = statement
                    .columns()
                    .iter()
                    .map(|column| SqlColumn {
                        name: column.name().to_string(),
                        r#type: column.type_info().name().to_string(),
                    })
                    .collect();

                let mut query = statement.query();
                for param in params {
                    query = match param {
                        SqlParam::Int(value) => query.bind(*value),
                        SqlParam::Text(value) => query.bind(value.as_str()),
                    };
                }
                let rows = query.fetch_all(&mut *connection).await?;
                Ok::<_, sqlx::Error>((columns, rows))
            })
            .map_err(classify)?;

        let rows = rows.iter().map(read_row).collect();
        Ok(QueryResult::new(columns, rows))
    }
}

impl Drop for RemoteSession {
    fn drop(&mut self) {
        // A runtime dropped on an async worker panics; this form does not.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn connect_options(remote: &RemoteWarehouse) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&remote.host)
        .port(remote.port)
        .database(&remote.database)
        .username(&remote.user)
        .password(&remote.password)
        .application_name("fcdash")
}

/// Map a driver error onto the warehouse error categories.
///
/// Transport failures leave the session unusable and count as connection
/// failures; everything else is a query error.
pub(crate) fn classify(error: sqlx::Error) -> WarehouseError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => WarehouseError::Connection(error.to_string()),
        other => WarehouseError::Postgres(other),
    }
}

/// Rewrite `?` placeholders as `$1, $2, ...`, leaving quoted text alone.
fn numbered_placeholders(sql: &str) -> String {
    let mut output = String::with_capacity(sql.len() + 8);
    let mut quote: Option<char> = None;
    let mut next = 1;

    for ch in sql.chars() {
        match (quote, ch) {
            (Some(open), _) if ch == open => {
                quote = None;
                output.push(ch);
            }
            (Some(_), _) => output.push(ch),
            (None, '\'' | '"') => {
                quote = Some(ch);
                output.push(ch);
            }
            (None, '?') => {
                output.push('$');
                output.push_str(&next.to_string());
                next += 1;
            }
            (None, _) => output.push(ch),
        }
    }
    output
}

fn read_row(row: &PgRow) -> Vec<Value> {
    (0..row.len()).map(|index| read_value(row, index)).collect()
}

fn read_value(row: &PgRow, index: usize) -> Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }

    let type_name = raw.type_info().name().to_string();
    let decoded = match type_name.as_str() {
        "BOOL" => row.try_get::<bool, _>(index).map(Value::Bool),
        "INT2" => row.try_get::<i16, _>(index).map(Value::from),
        "INT4" => row.try_get::<i32, _>(index).map(Value::from),
        "INT8" => row.try_get::<i64, _>(index).map(Value::from),
        "FLOAT4" => row
            .try_get::<f32, _>(index)
            .map(|value| number_from_f64(f64::from(value))),
        "FLOAT8" => row.try_get::<f64, _>(index).map(number_from_f64),
        "NUMERIC" => return numeric(&raw).map_or(Value::Null, number_from_f64),
        _ => row.try_get::<String, _>(index).map(Value::String),
    };

    decoded.unwrap_or_else(|error| {
        debug!(column = index, sql_type = %type_name, %error, "undecodable value read as null");
        Value::Null
    })
}

fn numeric(raw: &PgValueRef<'_>) -> Option<f64> {
    match raw.format() {
        PgValueFormat::Text => raw.as_str().ok()?.trim().parse().ok(),
        PgValueFormat::Binary => numeric_from_binary(raw.as_bytes().ok()?),
    }
}

/// Decode the binary NUMERIC layout: digit count, weight, sign, display
/// scale, then base-10000 digits.
fn numeric_from_binary(bytes: &[u8]) -> Option<f64> {
    let word = |at: usize| -> Option<[u8; 2]> {
        let pair = bytes.get(at..at + 2)?;
        Some([pair[0], pair[1]])
    };

    let digits = usize::try_from(i16::from_be_bytes(word(0)?)).ok()?;
    let weight = i32::from(i16::from_be_bytes(word(2)?));
    let sign = u16::from_be_bytes(word(4)?);
    if sign == NUMERIC_NAN {
        return None;
    }

    let mut value = 0.0_f64;
    for position in 0..digits {
        let digit = f64::from(i16::from_be_bytes(word(8 + position * 2)?));
        let exponent = weight - i32::try_from(position).ok()?;
        value += if exponent >= 0 {
            digit * 10_000_f64.powi(exponent)
        } else {
            digit / 10_000_f64.powi(-exponent)
        };
    }

    Some(if sign == NUMERIC_NEGATIVE { -value } else { value })
}
