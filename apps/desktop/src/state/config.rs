//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Loading                                │
//! │                                                                         │
//! │  1. Defaults (this file)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Config file (--config PATH, or the platform default)               │
//! │     ~/.config/stockbook/stockbook.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockbook.desktop/... (macOS)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Environment variables (STOCKBOOK_*)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! log_filter = "info,stockbook=debug,sqlx=warn"
//!
//! [database]
//! path = "/srv/stockbook/stockbook.db"
//! max_connections = 5
//! enforce_foreign_keys = false
//! connect_timeout_secs = 30
//!
//! [inventory]
//! expiry_warning_days = 30
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockbook_core::DEFAULT_EXPIRY_WARNING_DAYS;
use stockbook_db::DbConfig;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,stockbook=debug,sqlx=warn";

const CONFIG_FILE_NAME: &str = "stockbook.toml";
const DATABASE_FILE_NAME: &str = "stockbook.db";

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Default: platform data dir + `stockbook.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// See [`DbConfig::enforce_foreign_keys`].
    #[serde(default)]
    pub enforce_foreign_keys: bool,

    /// How long to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            enforce_foreign_keys: false,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// `[inventory]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Products expiring within this many days are flagged in listings.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,
}

fn default_expiry_warning_days() -> i64 {
    DEFAULT_EXPIRY_WARNING_DAYS
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            expiry_warning_days: default_expiry_warning_days(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` still wins.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub inventory: InventorySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_filter: default_log_filter(),
            database: DatabaseSettings::default(),
            inventory: InventorySettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit variable lookup.
    fn load_with(
        config_path: Option<&Path>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(var);
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.inventory.expiry_warning_days <= 0 {
            return Err(ConfigError::Invalid(
                "inventory.expiry_warning_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOCKBOOK_*` overrides from any key/value lookup. Unparseable values are
    /// ignored with a warning.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("STOCKBOOK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = var("STOCKBOOK_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %max, "Ignoring invalid STOCKBOOK_MAX_CONNECTIONS"),
            }
        }

        if let Some(secs) = var("STOCKBOOK_CONNECT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.database.connect_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring invalid STOCKBOOK_CONNECT_TIMEOUT_SECS"),
            }
        }

        if let Some(enforce) = var("STOCKBOOK_ENFORCE_FOREIGN_KEYS") {
            match enforce.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.database.enforce_foreign_keys = true,
                "0" | "false" | "no" | "off" => self.database.enforce_foreign_keys = false,
                _ => warn!(value = %enforce, "Ignoring invalid STOCKBOOK_ENFORCE_FOREIGN_KEYS"),
            }
        }

        if let Some(days) = var("STOCKBOOK_EXPIRY_WARNING_DAYS") {
            match days.parse::<i64>() {
                Ok(days) => self.inventory.expiry_warning_days = days,
                Err(_) => warn!(value = %days, "Ignoring invalid STOCKBOOK_EXPIRY_WARNING_DAYS"),
            }
        }

        if let Some(filter) = var("STOCKBOOK_LOG") {
            self.log_filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The configured database file, or the platform default.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Builds the pool configuration for [`stockbook_db::Database::new`].
    pub fn db_config(&self) -> Result<DbConfig, ConfigError> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
            .enforce_foreign_keys(self.database.enforce_foreign_keys))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockbook", "desktop")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.database.enforce_foreign_keys);
        assert_eq!(config.inventory.expiry_warning_days, 30);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[inventory]\nexpiry_warning_days = 14").unwrap();

        let config = AppConfig::load_with(Some(file.path()), lookup(&[])).unwrap();
        assert_eq!(config.inventory.expiry_warning_days, 14);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.connect_timeout_secs, 30);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load_with(Some(Path::new("/definitely/not/here.toml")), lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_file_then_overrides_then_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nmax_connections = 2\nconnect_timeout_secs = 12").unwrap();

        let config = AppConfig::load_with(
            Some(file.path()),
            lookup(&[("STOCKBOOK_MAX_CONNECTIONS", "4")]),
        )
        .unwrap();
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.connect_timeout_secs, 12);

        let err = AppConfig::load_with(
            Some(file.path()),
            lookup(&[("STOCKBOOK_CONNECT_TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database\nmax_connections = ").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            ("STOCKBOOK_DB_PATH", "/tmp/override.db"),
            ("STOCKBOOK_MAX_CONNECTIONS", "9"),
            ("STOCKBOOK_ENFORCE_FOREIGN_KEYS", "true"),
            ("STOCKBOOK_EXPIRY_WARNING_DAYS", "7"),
            ("STOCKBOOK_LOG", "warn"),
        ]));

        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.database.max_connections, 9);
        assert!(config.database.enforce_foreign_keys);
        assert_eq!(config.inventory.expiry_warning_days, 7);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            ("STOCKBOOK_MAX_CONNECTIONS", "lots"),
            ("STOCKBOOK_ENFORCE_FOREIGN_KEYS", "maybe"),
        ]));

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.inventory.expiry_warning_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_config_carries_settings() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::from("/tmp/x.db"));
        config.database.max_connections = 3;
        config.database.enforce_foreign_keys = true;
        config.database.connect_timeout_secs = 8;

        let db = config.db_config().unwrap();
        assert_eq!(db.connect_timeout, Duration::from_secs(8));
        assert_eq!(db.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(db.max_connections, 3);
        assert!(db.enforce_foreign_keys);
    }

    #[test]
    fn test_toml_round_trip_shape() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[database]"));
        assert!(text.contains("[inventory]"));
        assert!(text.contains("expiry_warning_days = 30"));
    }
}
