use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::view::ResponsePolicy;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 3000;

/// Top-level configuration stored on disk.
///
/// Every field has a default (`#[serde(default)]`), so older or hand-written
/// files that leave keys out still load.
///
/// Example TOML:
/// ```toml
/// endpoint = "http://localhost:5000"
/// notification_timeout_ms = 3000
/// response_policy = "last-arrival"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the prediction service; requests go to `<endpoint>/predict`.
    pub endpoint: String,

    /// How long a notification stays up before hiding itself.
    pub notification_timeout_ms: u64,

    pub response_policy: ResponsePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            response_policy: ResponsePolicy::default(),
        }
    }
}

impl Config {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    /// Replace the endpoint for this run only, e.g. from `--endpoint`.
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    /// Replace the response policy for this run only, e.g. from `--policy`.
    pub fn with_policy_override(mut self, policy: Option<ResponsePolicy>) -> Self {
        if let Some(policy) = policy {
            self.response_policy = policy;
        }
        self
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    ///
    /// Keys missing from the file take their default values, so a file
    /// holding only `endpoint = "..."` is valid.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-prediction", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
