//! Repository list source with a degrade-to-default fallback.

use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::ObjectStore;
use crate::types::RepoRef;

/// The repository substituted when the configured list cannot be loaded.
pub fn fallback_repositories() -> Vec<RepoRef> {
    vec![RepoRef::new("aws-samples", "anthropic-on-aws")]
}

/// Load the monitored-repository list from `bucket`/`key`.
///
/// On ANY read or parse error the run degrades to
/// [`fallback_repositories`] instead of failing. This is the deliberate
/// contract: a broken list source turns into loud warnings plus a
/// one-repository sample run, never an aborted run. An empty list that
/// parses cleanly is returned as-is.
pub async fn load_repositories(store: &dyn ObjectStore, bucket: &str, key: &str) -> Vec<RepoRef> {
    match try_load(store, bucket, key).await {
        Ok(repos) => {
            info!(bucket, key, count = repos.len(), "loaded repository list");
            repos
        }
        Err(e) => {
            let fallback = fallback_repositories();
            warn!(
                bucket,
                key,
                error = %e,
                fallback = %fallback[0],
                "failed to load repository list, degrading to default"
            );
            fallback
        }
    }
}

async fn try_load(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<Vec<RepoRef>, ListLoadError> {
    let bytes = store.get_object(bucket, key).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(thiserror::Error, Debug)]
enum ListLoadError {
    #[error("read failed: {0}")]
    Read(#[from] StoreError),
    #[error("parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
