//! Dashboard configuration.
//!
//! Settings live in a TOML secret file read once at process start:
//!
//! ```toml
//! [warehouse]            # `[redshift]` is accepted as well
//! host = "cluster.example.ap-northeast-2.redshift.amazonaws.com"
//! port = 5439
//! database = "dev"
//! user = "dashboard"
//! password = "..."
//!
//! [dashboard]
//! ranker_limit = 20
//! ```
//!
//! Without a `host` the warehouse is a local `DuckDB` file (`path`, relative
//! to the config file, defaulting to `$FCDASH_HOME/warehouse.duckdb`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use fcdash_warehouse::WarehouseConfig;
use serde::Deserialize;
use time::UtcOffset;

use crate::error::ConfigError;

/// Config file name looked up under the dashboard home directory.
pub const CONFIG_FILE_NAME: &str = "secrets.toml";

/// Everything read from the secret file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(alias = "redshift")]
    pub warehouse: WarehouseConfig,
    pub dashboard: DashboardConfig,
}

/// Presentation settings for the page handlers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the per-player action images (`p{spid}.png`).
    pub image_base_url: String,
    /// Image shown when a player image does not exist.
    pub placeholder_image_url: String,
    /// Rows shown in a tier leaderboard.
    pub ranker_limit: u32,
    /// Offset used for the "last updated" timestamp.
    pub utc_offset_hours: i8,
    /// Timeout of one image-existence probe.
    pub probe_timeout_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            image_base_url: String::from(
                "https://fco.dn.nexoncdn.co.kr/live/externalAssets/common/playersAction",
            ),
            placeholder_image_url: String::from(
                "https://fco.dn.nexoncdn.co.kr/live/externalAssets/common/players/not_found.png",
            ),
            ranker_limit: 20,
            utc_offset_hours: 9,
            probe_timeout_ms: 1_500,
        }
    }
}

impl DashboardConfig {
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }

    /// Action image of a player.
    pub fn player_image_url(&self, spid: &str) -> String {
        format!("{}/p{spid}.png", self.image_base_url.trim_end_matches('/'))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ranker_limit == 0 {
            return Err(ConfigError::Invalid(String::from(
                "ranker_limit must be greater than zero",
            )));
        }
        if UtcOffset::from_hms(self.utc_offset_hours, 0, 0).is_err() {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_hours {} is out of range",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parse config text. Relative warehouse paths resolve against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        config.resolve_paths(base_dir);
        Ok(config)
    }

    /// Load a config file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, is not valid
    /// TOML, or carries out-of-range settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config =
            Self::from_toml_str(&text, base_dir).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.dashboard.validate()?;
        Ok(config)
    }

    /// Load `$FCDASH_CONFIG`, else `$FCDASH_HOME/secrets.toml`.
    ///
    /// A missing default file is not an error: the dashboard then runs
    /// against the local warehouse in the home directory.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("FCDASH_CONFIG").filter(|path| !path.is_empty()) {
            return Self::load(Path::new(&path));
        }

        let home = resolve_fcdash_home();
        let path = home.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Self::load(&path);
        }

        let mut config = Self::default();
        config.resolve_paths(&home);
        Ok(config)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        if self.warehouse.host.is_some() {
            return;
        }
        self.warehouse.path = Some(match self.warehouse.path.take() {
            Some(path) if path.is_relative() => base_dir.join(path),
            Some(path) => path,
            None => base_dir.join("warehouse.duckdb"),
        });
    }
}

/// Resolve the dashboard home directory from environment or default.
pub fn resolve_fcdash_home() -> PathBuf {
    if let Some(path) = env::var_os("FCDASH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".fcdash");
    }

    PathBuf::from(".fcdash")
}
