//! GitHub REST client implementing the [`RepoHost`] seam.

use std::sync::Once;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::DEFAULT_API_BASE;
use crate::error::FetchError;
use crate::types::RepoRef;

use super::host::{
    CommitActivityWeek, Contributor, Issue, PullRequest, RepoHost, Release, Repository,
};

/// Page size for list endpoints.
const PAGE_SIZE: u32 = 100;
/// Pause and wait for reset when remaining drops below this threshold.
const RATE_LIMIT_PAUSE_THRESHOLD: u32 = 5;

/// Authenticated GitHub REST API client.
///
/// Requests are a single best-effort attempt — a failed call fails the
/// repository it belongs to, and the collector drops that repository.
/// The only waiting behavior is the rate-limit pause: when the remaining
/// quota reported by response headers runs low, the client sleeps until
/// the window resets before issuing the next request.
#[derive(Debug)]
pub struct GithubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
    /// Remaining API calls before the rate limit window resets.
    rate_remaining: AtomicU32,
    /// Unix timestamp when the rate limit window resets.
    rate_reset: AtomicU64,
}

/// Reqwest is built with the no-provider rustls feature, so a process
/// default `CryptoProvider` must exist before the first client build.
fn ensure_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Self {
        ensure_crypto_provider();
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token,
            client: Client::new(),
            rate_remaining: AtomicU32::new(u32::MAX),
            rate_reset: AtomicU64::new(0),
        }
    }

    /// Point the client at a different API base (tests, GHES).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.wait_for_rate_reset().await;

        let mut req = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "pulse/0.1");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        debug!(url, "GitHub API request");
        let resp = req.send().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;
        self.update_rate_limit(&resp);
        Ok(resp)
    }

    async fn api_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.send(&url).await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api { url, status, body });
        }
        resp.json()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }

    /// Like [`api_get`], but a 404 is a non-error `None`.
    async fn api_get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.send(&url).await?;
        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api { url, status, body });
        }
        resp.json()
            .await
            .map(Some)
            .map_err(|source| FetchError::Decode { url, source })
    }

    /// Fetch every page of a list endpoint.
    async fn api_get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<T> = self.api_get(&paged_path(path, page)).await?;
            let len = batch.len();
            items.extend(batch);
            if len < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    /// Update rate limit state from response headers.
    fn update_rate_limit(&self, resp: &reqwest::Response) {
        if let Some(remaining) = resp
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
        {
            self.rate_remaining.store(remaining, Ordering::Relaxed);
            if remaining < 10 {
                warn!(remaining, "GitHub API rate limit low");
            }
        }
        if let Some(reset) = resp
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.rate_reset.store(reset, Ordering::Relaxed);
        }
    }

    /// Sleep until the rate limit window resets if remaining is low.
    async fn wait_for_rate_reset(&self) {
        if self.rate_remaining.load(Ordering::Relaxed) > RATE_LIMIT_PAUSE_THRESHOLD {
            return;
        }
        let reset_at = self.rate_reset.load(Ordering::Relaxed);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        if reset_at > now {
            let wait = reset_at - now + 1;
            warn!(
                remaining = self.rate_remaining.load(Ordering::Relaxed),
                wait_secs = wait,
                "Rate limit low, waiting for reset"
            );
            tokio::time::sleep(Duration::from_secs(wait)).await;
        }
    }
}

/// Append page parameters to a path that may already carry a query.
fn paged_path(path: &str, page: u32) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}per_page={PAGE_SIZE}&page={page}")
}

#[async_trait::async_trait]
impl RepoHost for GithubClient {
    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, FetchError> {
        self.api_get(&format!("/repos/{}/{}", repo.owner, repo.repo))
            .await
    }

    async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>, FetchError> {
        self.api_get_paged(&format!(
            "/repos/{}/{}/issues?state=all&filter=all",
            repo.owner, repo.repo
        ))
        .await
    }

    async fn list_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequest>, FetchError> {
        self.api_get_paged(&format!(
            "/repos/{}/{}/pulls?state=all",
            repo.owner, repo.repo
        ))
        .await
    }

    async fn list_contributors(&self, repo: &RepoRef) -> Result<Vec<Contributor>, FetchError> {
        self.api_get_paged(&format!(
            "/repos/{}/{}/contributors",
            repo.owner, repo.repo
        ))
        .await
    }

    async fn latest_release(&self, repo: &RepoRef) -> Result<Option<Release>, FetchError> {
        self.api_get_optional(&format!(
            "/repos/{}/{}/releases/latest",
            repo.owner, repo.repo
        ))
        .await
    }

    async fn weekly_commit_activity(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<CommitActivityWeek>, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/stats/commit_activity",
            self.base_url, repo.owner, repo.repo
        );
        let resp = self.send(&url).await?;
        // 202: GitHub is still computing the statistics. Treated as an
        // empty bucket sequence, which the derivation defaults to 0.
        if resp.status().as_u16() == 202 {
            debug!(%repo, "commit activity not yet computed");
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api { url, status, body });
        }
        resp.json()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}
