//! Warehouse connection parameters.

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use serde::Deserialize;

/// Default port of a Redshift cluster.
pub const DEFAULT_PORT: u16 = 5439;

/// Fixed connection parameters, read once at process start.
///
/// When `host` is set the dashboard connects to a Postgres-wire warehouse
/// (Redshift included). Otherwise it opens the local `DuckDB` file at `path`,
/// or an in-memory database when neither is given.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Local `DuckDB` database file.
    pub path: Option<PathBuf>,
    /// Remote warehouse host.
    pub host: Option<String>,
    /// Remote warehouse port.
    pub port: u16,
    /// Remote database name.
    pub database: String,
    /// Remote user.
    pub user: Option<String>,
    /// Remote password. Never logged.
    pub password: Option<String>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: None,
            host: None,
            port: DEFAULT_PORT,
            database: String::from("dev"),
            user: None,
            password: None,
        }
    }
}

impl WarehouseConfig {
    /// Configuration for a local `DuckDB` file.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Configuration for a remote Postgres-wire warehouse.
    pub fn remote(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            path: None,
            host: Some(host.into()),
            port,
            database: database.into(),
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// Resolve which kind of warehouse these parameters point at.
    pub fn target(&self) -> WarehouseTarget {
        if let Some(host) = self.host.as_deref().filter(|host| !host.trim().is_empty()) {
            return WarehouseTarget::Remote(RemoteWarehouse {
                host: host.trim().to_string(),
                port: self.port,
                database: self.database.clone(),
                user: self.user.clone().unwrap_or_default(),
                password: self.password.clone().unwrap_or_default(),
            });
        }

        match &self.path {
            Some(path) => WarehouseTarget::Local(path.clone()),
            None => WarehouseTarget::InMemory,
        }
    }
}

impl Debug for WarehouseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("path", &self.path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where the connection manager will connect to.
#[derive(Clone, PartialEq, Eq)]
pub enum WarehouseTarget {
    InMemory,
    Local(PathBuf),
    Remote(RemoteWarehouse),
}

impl Display for WarehouseTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => f.write_str(":memory:"),
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(remote) => write!(
                f,
                "postgres://{}@{}:{}/{}",
                remote.user, remote.host, remote.port, remote.database
            ),
        }
    }
}

impl Debug for WarehouseTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Resolved remote connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteWarehouse {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}
