//! The repository-hosting API seam and its wire types.

use serde::Deserialize;

use crate::error::FetchError;
use crate::types::RepoRef;

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub open_issues_count: i64,
    /// GitHub's true watcher count; `watchers_count` mirrors stars.
    #[serde(default)]
    pub subscribers_count: i64,
    pub language: Option<String>,
    pub license: Option<License>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub size: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct License {
    /// Display name, e.g. "MIT License".
    pub name: String,
}

/// One issue from `GET /repos/{owner}/{repo}/issues?state=all`.
///
/// The issues endpoint also returns pull requests; those carry a
/// `pull_request` back-reference and must be excluded from issue counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    pub state: String,
    pub created_at: String,
    pub closed_at: Option<String>,
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// True when this "issue" is actually a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// One pull request from `GET /repos/{owner}/{repo}/pulls?state=all`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    pub state: String,
    pub created_at: String,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: i64,
}

/// The most recent release, when one exists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    pub name: Option<String>,
    pub tag_name: Option<String>,
    pub published_at: Option<String>,
}

/// One weekly commit-activity bucket from the statistics endpoint.
/// Buckets arrive ordered oldest to newest.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommitActivityWeek {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub week: i64,
}

/// Authenticated read access to the repository hosting API.
///
/// One implementation talks to GitHub over REST; tests substitute a
/// programmable fake. Every method is a single best-effort attempt.
#[async_trait::async_trait]
pub trait RepoHost: Send + Sync {
    /// Repository metadata.
    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, FetchError>;

    /// All issues, any state, pull-request-backed entries included.
    async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>, FetchError>;

    /// All pull requests, any state.
    async fn list_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequest>, FetchError>;

    /// The full contributor list.
    async fn list_contributors(&self, repo: &RepoRef) -> Result<Vec<Contributor>, FetchError>;

    /// The most recent release; `None` when the repository has none.
    async fn latest_release(&self, repo: &RepoRef) -> Result<Option<Release>, FetchError>;

    /// Weekly commit-activity buckets, oldest to newest. Empty when the
    /// statistics are unavailable or still being computed.
    async fn weekly_commit_activity(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<CommitActivityWeek>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_repository_with_sparse_fields() {
        let json = r#"{
            "description": null,
            "stargazers_count": 12,
            "forks_count": 3,
            "language": "Rust",
            "license": {"name": "MIT License", "spdx_id": "MIT"},
            "topics": ["cli", "metrics"],
            "created_at": "2020-01-01T00:00:00Z"
        }"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stargazers_count, 12);
        assert_eq!(repo.subscribers_count, 0);
        assert_eq!(repo.license.unwrap().name, "MIT License");
        assert_eq!(repo.topics, vec!["cli", "metrics"]);
        assert!(repo.pushed_at.is_none());
    }

    #[test]
    fn issue_pull_request_back_reference() {
        let json = r#"{
            "state": "closed",
            "created_at": "2024-01-01T00:00:00Z",
            "closed_at": "2024-01-02T00:00:00Z",
            "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/1"}
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert!(issue.is_pull_request());

        let plain = r#"{"state": "open", "created_at": "2024-01-01T00:00:00Z"}"#;
        let issue: Issue = serde_json::from_str(plain).unwrap();
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn deserialize_commit_activity() {
        let json = r#"[{"total": 5, "week": 1700000000, "days": [1,1,1,1,1,0,0]}]"#;
        let weeks: Vec<CommitActivityWeek> = serde_json::from_str(json).unwrap();
        assert_eq!(weeks[0].total, 5);
    }
}
