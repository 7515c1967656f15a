//! Configuration resolution for FairHire services
//!
//! Two-tier resolution with ENV → TOML priority. Every value except the
//! scoring service URL has a default; a missing scorer URL is fatal at
//! startup since the service cannot degrade without its upstream.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5780;

/// Default path of the SQLite database file
pub const DEFAULT_DB_PATH: &str = "fairhire.db";

/// Default directory holding the candidate and country-stats fixtures
pub const DEFAULT_DATA_DIR: &str = "data";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external scoring service (required)
    pub scorer_url: String,
    /// SQLite database file path
    pub db_path: PathBuf,
    /// Directory containing the JSON fixtures
    pub data_dir: PathBuf,
    /// HTTP listen port
    pub port: u16,
}

/// Optional TOML configuration file contents
///
/// File location comes from `FAIRHIRE_CONFIG`; absent file is not an error.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub scorer_url: Option<String>,
    pub db_path: Option<String>,
    pub data_dir: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Resolve configuration from environment variables with TOML fallback
    ///
    /// Priority per key: ENV → TOML → default. Fails with `Error::Config`
    /// when no scorer URL is found in any tier.
    pub fn load() -> Result<Self> {
        let toml_config = match std::env::var("FAIRHIRE_CONFIG") {
            Ok(path) => read_toml_config(Path::new(&path))?,
            Err(_) => TomlConfig::default(),
        };

        let scorer_url = resolve(
            "FAIRHIRE_SCORER_URL",
            toml_config.scorer_url.clone(),
            None,
            "scorer_url",
        )
        .ok_or_else(|| {
            Error::Config(
                "Scoring service URL not configured. Set FAIRHIRE_SCORER_URL \
                 or scorer_url in the TOML config."
                    .to_string(),
            )
        })?;

        let db_path = resolve(
            "FAIRHIRE_DB_PATH",
            toml_config.db_path.clone(),
            Some(DEFAULT_DB_PATH.to_string()),
            "db_path",
        )
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let data_dir = resolve(
            "FAIRHIRE_DATA_DIR",
            toml_config.data_dir.clone(),
            Some(DEFAULT_DATA_DIR.to_string()),
            "data_dir",
        )
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let port = match std::env::var("FAIRHIRE_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|e| {
                Error::Config(format!("Invalid FAIRHIRE_PORT '{}': {}", value, e))
            })?,
            Err(_) => toml_config.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Config {
            scorer_url: scorer_url.trim_end_matches('/').to_string(),
            db_path,
            data_dir,
            port,
        })
    }
}

/// Resolve one string-valued key from ENV, then TOML, then default
fn resolve(
    env_key: &str,
    toml_value: Option<String>,
    default: Option<String>,
    name: &str,
) -> Option<String> {
    if let Ok(value) = std::env::var(env_key) {
        if !value.trim().is_empty() {
            info!("{} loaded from environment ({})", name, env_key);
            return Some(value);
        }
    }

    if let Some(value) = toml_value {
        if !value.trim().is_empty() {
            info!("{} loaded from TOML config", name);
            return Some(value);
        }
    }

    default
}

/// Read the optional TOML config file
///
/// An absent file resolves to defaults; a present but malformed file is a
/// configuration error rather than a silent fallback.
fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found: {} (using defaults)", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}
