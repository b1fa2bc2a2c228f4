//! Process-wide warehouse connection management.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use ::duckdb::Connection;
use tracing::{info, warn};

use crate::config::{WarehouseConfig, WarehouseTarget};
use crate::remote::RemoteSession;
use crate::WarehouseError;

/// An open warehouse handle.
pub(crate) enum Session {
    Local(Connection),
    Remote(RemoteSession),
}

/// Owns the single long-lived warehouse connection.
///
/// The connection is opened on first use and reused by every later call. A
/// failed attempt is not remembered: the next call tries again. A session
/// that fails mid-query with a connection error is dropped and reopened on
/// the next call.
pub struct ConnectionManager {
    config: WarehouseConfig,
    slot: Mutex<Option<Session>>,
    attempts: AtomicU64,
}

impl ConnectionManager {
    /// Create a manager. No connection is opened until first use.
    #[must_use]
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Run `f` against the shared local `DuckDB` connection, opening it if
    /// needed.
    ///
    /// Calls are serialized: at most one query is in flight at a time.
    ///
    /// # Errors
    /// Returns [`WarehouseError::Connection`] when the warehouse cannot be
    /// reached, [`WarehouseError::QueryRejected`] when the target is a remote
    /// warehouse, or whatever `f` returns.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, WarehouseError>,
    ) -> Result<T, WarehouseError> {
        self.with_session(|session| match session {
            Session::Local(connection) => f(connection),
            Session::Remote(_) => Err(WarehouseError::QueryRejected(String::from(
                "remote warehouses only accept read queries",
            ))),
        })
    }

    /// Run `f` against the shared session of either kind.
    pub(crate) fn with_session<T>(
        &self,
        f: impl FnOnce(&mut Session) -> Result<T, WarehouseError>,
    ) -> Result<T, WarehouseError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let session = match slot.take() {
            Some(session) => session,
            None => self.connect()?,
        };

        let result = f(slot.insert(session));
        if let Err(error) = &result {
            if error.is_connection_failure() {
                warn!(%error, "warehouse session lost; reconnecting on next use");
                *slot = None;
            }
        }
        result
    }

    /// Whether a connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of connection attempts made so far.
    pub fn connect_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Connection parameters this manager was built with.
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    fn connect(&self) -> Result<Session, WarehouseError> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let target = self.config.target();
        info!(%target, attempt, "opening warehouse connection");

        let opened = match &target {
            WarehouseTarget::InMemory => open_local(Connection::open_in_memory()),
            WarehouseTarget::Local(path) => open_local(Connection::open(path)),
            WarehouseTarget::Remote(remote) => RemoteSession::connect(remote)
                .map(Session::Remote)
                .map_err(|error| error.to_string()),
        };

        opened.map_err(|error| {
            warn!(%target, attempt, %error, "warehouse connection failed");
            WarehouseError::Connection(error)
        })
    }
}

fn open_local(opened: Result<Connection, ::duckdb::Error>) -> Result<Session, String> {
    let prepare = |connection: Connection| -> Result<Session, ::duckdb::Error> {
        connection.execute_batch("PRAGMA disable_progress_bar;")?;
        Ok(Session::Local(connection))
    };
    opened.and_then(prepare).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn connection_is_opened_once_and_reused() {
        let manager = ConnectionManager::new(WarehouseConfig::default());
        assert!(!manager.is_connected());

        for _ in 0..3 {
            let one: i64 = manager
                .with_connection(|connection| {
                    Ok(connection.query_row("SELECT 1", [], |row| row.get(0))?)
                })
                .expect("query");
            assert_eq!(one, 1);
        }

        assert!(manager.is_connected());
        assert_eq!(manager.connect_attempts(), 1);
    }

    #[test]
    fn state_written_through_the_handle_is_visible_to_later_calls() {
        let manager = ConnectionManager::new(WarehouseConfig::default());
        manager
            .with_connection(|connection| {
                connection.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (7);")?;
                Ok(())
            })
            .expect("create");

        let value: i64 = manager
            .with_connection(|connection| Ok(connection.query_row("SELECT id FROM t", [], |row| row.get(0))?))
            .expect("select");
        assert_eq!(value, 7);
    }

    #[test]
    fn failed_connect_is_retried_on_next_call() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing-dir").join("fc.duckdb");
        let manager = ConnectionManager::new(WarehouseConfig::local(missing));

        let first = manager.with_connection(|_| Ok(()));
        let second = manager.with_connection(|_| Ok(()));

        assert!(matches!(first, Err(WarehouseError::Connection(_))));
        assert!(matches!(second, Err(WarehouseError::Connection(_))));
        assert!(!manager.is_connected());
        assert_eq!(manager.connect_attempts(), 2);
    }

    #[test]
    fn unreachable_remote_is_a_connection_failure_and_retried() {
        // Nothing listens on port 1 of the loopback interface.
        let manager =
            ConnectionManager::new(WarehouseConfig::remote("127.0.0.1", 1, "dev", "fc", "pw"));

        let first = manager.with_session(|_| Ok(()));
        let second = manager.with_session(|_| Ok(()));

        assert!(first.is_err_and(|error| error.is_connection_failure()));
        assert!(second.is_err_and(|error| error.is_connection_failure()));
        assert!(!manager.is_connected());
        assert_eq!(manager.connect_attempts(), 2);
    }

    #[test]
    fn session_lost_mid_query_is_reopened() {
        let manager = ConnectionManager::new(WarehouseConfig::default());

        let lost: Result<(), _> = manager.with_connection(|_| {
            Err(WarehouseError::Connection(String::from("connection reset")))
        });
        assert!(lost.is_err());
        assert!(!manager.is_connected());

        manager
            .with_connection(|connection| Ok(connection.execute_batch("SELECT 1")?))
            .expect("reconnect");
        assert!(manager.is_connected());
        assert_eq!(manager.connect_attempts(), 2);
    }

    #[test]
    fn query_errors_keep_the_session() {
        let manager = ConnectionManager::new(WarehouseConfig::default());

        let failed = manager.with_connection(|connection| {
            Ok(connection.execute_batch("SELECT * FROM no_such_table")?)
        });
        assert!(matches!(failed, Err(WarehouseError::DuckDb(_))));
        assert!(manager.is_connected());
        assert_eq!(manager.connect_attempts(), 1);
    }
}
