use crate::error::{CatalogError, Result};
use crate::search::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, stored as `config.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL of the catalog backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Result limit used when a search does not set one
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            default_limit: default_limit(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Keys accepted by `config get/set`.
pub const CONFIG_KEYS: [&str; 3] = ["api-url", "default-limit", "timeout"];

impl CatalogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CatalogConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api-url" => Ok(self.api_url.clone()),
            "default-limit" => Ok(self.default_limit.to_string()),
            "timeout" => Ok(self.timeout_secs.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-url" => self.set_api_url(value)?,
            "default-limit" => {
                self.default_limit = parse_positive(key, value)? as u32;
            }
            "timeout" => {
                self.timeout_secs = parse_positive(key, value)?;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    /// Set the backend URL (validated, trailing slash removed)
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| CatalogError::Config(format!("Invalid api-url '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::Config(format!(
                "api-url must be http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.api_url = url.trim_end_matches('/').to_string();
        Ok(())
    }
}

fn unknown_key(key: &str) -> CatalogError {
    CatalogError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(CatalogError::Config(format!(
            "{} must be a positive number, got '{}'",
            key, value
        ))),
    }
}
