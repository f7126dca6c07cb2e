use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;

pub const ENV_BASE_URL: &str = "RESTFAULT_BASE_URL";
pub const ENV_ACCEPT: &str = "RESTFAULT_ACCEPT";
pub const ENV_USER_AGENT: &str = "RESTFAULT_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "RESTFAULT_TIMEOUT_SECS";

/// Client settings, loaded from YAML with environment overrides
///
/// Every field has a default, so an empty file is a valid config.
///
/// ```yaml
/// base_url: https://api.example.com/v4
/// accept: application/json
/// timeout_secs: 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for relative request paths
    pub base_url: Option<String>,
    /// `Accept` header sent when a request declares none
    pub accept: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            accept: "application/json".to_string(),
            user_agent: concat!("restfault/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load config from a YAML file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Applies `RESTFAULT_*` environment overrides
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup, keyed by the `RESTFAULT_*` names
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(base_url);
        }
        if let Some(accept) = lookup(ENV_ACCEPT) {
            self.accept = accept;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: timeout.clone(),
            })?;
        }
        Ok(self)
    }

    /// Joins a request path onto `base_url`; absolute URLs pass through
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }
}
