use crate::error::StoreError;

use super::traits::SecretStore;

/// Secret store backed by process environment variables.
///
/// The secret identifier is the variable name; the value must be the
/// JSON-encoded secret payload. This is the zero-infrastructure backend
/// for local runs.
#[derive(Debug, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<serde_json::Value, StoreError> {
        let raw = std::env::var(name).map_err(|_| StoreError::NotFound(name.to_string()))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("secret {name} is not valid JSON: {e}")))
    }
}
