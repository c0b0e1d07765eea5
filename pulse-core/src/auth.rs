//! Credential provider: resolves the hosting-API token from a secret store.

use tracing::debug;

use crate::error::{AuthError, Result};
use crate::store::SecretStore;

/// Field of the JSON secret payload holding the API token.
pub const TOKEN_FIELD: &str = "token";

/// Fetch the API token stored under `secret_id`.
///
/// The secret payload must be a JSON object with a non-empty
/// [`TOKEN_FIELD`]. Any store miss or malformed payload is an
/// [`AuthError`]; there is no retry.
pub async fn fetch_token(store: &dyn SecretStore, secret_id: &str) -> Result<String> {
    let payload = store
        .get_secret(secret_id)
        .await
        .map_err(|source| AuthError::Secret {
            id: secret_id.to_string(),
            source,
        })?;

    if !payload.is_object() {
        return Err(AuthError::MalformedSecret {
            id: secret_id.to_string(),
        }
        .into());
    }

    let token = payload
        .get(TOKEN_FIELD)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if token.is_empty() {
        return Err(AuthError::MissingToken {
            id: secret_id.to_string(),
            field: TOKEN_FIELD,
        }
        .into());
    }

    debug!(secret_id, "resolved API token");
    Ok(token.to_string())
}
