use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default base URL for the GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default object key holding the monitored-repository list.
pub const DEFAULT_LIST_KEY: &str = "config/repositories.json";

/// Default key prefix for written insight objects.
pub const DEFAULT_PREFIX: &str = "github-insights";

/// Top-level Pulse configuration, supplied through the run environment.
///
/// `secret_id` and `bucket` are required; everything else has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Secret-store identifier holding the JSON token payload.
    #[serde(default)]
    pub secret_id: String,
    /// Bucket holding the repository list and receiving insight output.
    #[serde(default)]
    pub bucket: String,
    /// Object key of the monitored-repository list.
    #[serde(default = "default_list_key")]
    pub list_key: String,
    /// Key prefix for written insight objects.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Maximum repositories collected concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Hosting API base URL (overridable for tests).
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_list_key() -> String {
    DEFAULT_LIST_KEY.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            secret_id: String::new(),
            bucket: String::new(),
            list_key: default_list_key(),
            prefix: default_prefix(),
            concurrency: default_concurrency(),
            api_base: default_api_base(),
        }
    }
}

impl PulseConfig {
    /// Build a configuration from `PULSE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Keys are the `PULSE_*` environment variable names; unknown or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            secret_id: get("PULSE_SECRET_ID").unwrap_or(defaults.secret_id),
            bucket: get("PULSE_BUCKET").unwrap_or(defaults.bucket),
            list_key: get("PULSE_LIST_KEY").unwrap_or(defaults.list_key),
            prefix: get("PULSE_PREFIX").unwrap_or(defaults.prefix),
            concurrency: get("PULSE_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.concurrency),
            api_base: get("PULSE_API_BASE").unwrap_or(defaults.api_base),
        }
    }

    /// Check that required settings are present and sane.
    ///
    /// Absence of the secret identifier or bucket is a fatal
    /// configuration error per the run contract.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_id.is_empty() {
            return Err(ConfigError::Missing("secret_id (PULSE_SECRET_ID)"));
        }
        if self.bucket.is_empty() {
            return Err(ConfigError::Missing("bucket (PULSE_BUCKET)"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "concurrency",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
