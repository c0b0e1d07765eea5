use crate::error::StoreError;

/// Read-only secret retrieval. Secrets are JSON-encoded payloads.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the JSON payload stored under `name`.
    async fn get_secret(&self, name: &str) -> Result<serde_json::Value, StoreError>;
}

/// Minimal object-storage surface: whole-object get and put.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full contents of `key` in `bucket`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write `bytes` to `key` in `bucket`, replacing any existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}
