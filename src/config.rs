use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{GrafanaError, Result};
use crate::grafana::request::Auth;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grafana: GrafanaConfig,
}

/// Connection settings as they appear in the config file or on the command line.
/// Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrafanaConfig {
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Fully resolved settings the API client is built from.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub auth: Auth,
    pub timeout: Duration,
}

impl Config {
    /// Loads the config file. An explicit path must exist; without one the
    /// default file is read only when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            GrafanaError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

fn pick(over: Option<String>, base: Option<String>) -> Option<String> {
    over.filter(|s| !s.is_empty()).or(base)
}

impl GrafanaConfig {
    /// Layers `overrides` on top of `self`; set, non-empty values win.
    pub fn merge(self, overrides: GrafanaConfig) -> GrafanaConfig {
        GrafanaConfig {
            url: pick(overrides.url, self.url),
            api_token: pick(overrides.api_token, self.api_token),
            username: pick(overrides.username, self.username),
            password: pick(overrides.password, self.password),
            timeout_seconds: overrides.timeout_seconds.or(self.timeout_seconds),
        }
    }

    pub fn into_settings(self) -> Result<ClientSettings> {
        let base_url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| GrafanaError::Config("Grafana URL is required".to_string()))?;

        let auth = Auth::from_credentials(
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
            self.api_token.unwrap_or_default(),
        );

        let timeout_seconds = self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        if timeout_seconds == 0 {
            return Err(GrafanaError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(ClientSettings {
            base_url,
            auth,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}
