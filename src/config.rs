//! Configuration
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file
//! (`askdata.toml` in the working directory or `--config`), environment
//! variables, then the `--endpoint` flag. The backend address has no default
//! and must come from one of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "askdata.toml";
/// Base URL of the query backend
pub const ENV_API_URL: &str = "ASKDATA_API_URL";
/// Request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ASKDATA_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No backend endpoint configured (set [backend].base_url, ASKDATA_API_URL, or --endpoint)")]
    MissingEndpoint,

    #[error("Invalid backend endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Request timeout must be at least 1 second")]
    ZeroTimeout,
}

/// File-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

/// `[backend]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; `/query` and `/health` are appended
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Row cap sent with each query (backend default when unset)
    pub max_rows: Option<u32>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_rows: None,
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `ASKDATA_LOG` is unset
    pub level: String,
    /// Directory for `askdata.log` (OS temp dir when unset)
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Fully resolved settings used at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: Url,
    pub timeout: Duration,
    pub max_rows: Option<u32>,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, or from `askdata.toml` if it exists
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&content)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.backend.timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    /// Produce runtime settings; `endpoint` (from the CLI) wins over everything
    pub fn resolve(self, endpoint: Option<&str>) -> Result<Settings> {
        let raw = endpoint
            .map(str::to_string)
            .or(self.backend.base_url)
            .ok_or(ConfigError::MissingEndpoint)?;

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Settings {
            base_url: parse_endpoint(&raw)?,
            timeout: Duration::from_secs(self.backend.timeout_secs),
            max_rows: self.backend.max_rows,
            log_level: self.logging.level,
            log_dir: self.logging.directory.unwrap_or_else(std::env::temp_dir),
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}
