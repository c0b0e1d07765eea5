// Integration test fixtures for Pulse: a programmable repository host
// and store helpers.
#![allow(clippy::cast_possible_wrap)]

use std::collections::{HashMap, HashSet};

use pulse_core::collect::host::{
    CommitActivityWeek, Contributor, Issue, PullRequest, RepoHost, Release, Repository,
};
use pulse_core::error::{FetchError, StoreError};
use pulse_core::store::{MemoryObjectStore, ObjectStore};
use pulse_core::types::RepoRef;

/// Canned per-repository data served by [`FakeHost`].
#[derive(Debug, Default)]
pub struct RepoData {
    pub repository: Repository,
    pub issues: Vec<Issue>,
    pub pulls: Vec<PullRequest>,
    pub contributors: Vec<Contributor>,
    pub release: Option<Release>,
    pub weeks: Vec<CommitActivityWeek>,
}

/// A programmable [`RepoHost`]: serves canned data per repository and
/// fails the calls it is told to fail. Unknown repositories 404.
#[derive(Debug, Default)]
pub struct FakeHost {
    repos: HashMap<String, RepoData>,
    fail_metadata: HashSet<String>,
    fail_issues: HashSet<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, repo: &RepoRef, data: RepoData) {
        self.repos.insert(repo.full_name(), data);
    }

    /// Make `get_repository` fail for this repository.
    pub fn fail_metadata(&mut self, repo: &RepoRef) {
        self.fail_metadata.insert(repo.full_name());
    }

    /// Make `list_issues` fail for this repository.
    pub fn fail_issues(&mut self, repo: &RepoRef) {
        self.fail_issues.insert(repo.full_name());
    }

    fn data(&self, repo: &RepoRef) -> Result<&RepoData, FetchError> {
        self.repos
            .get(&repo.full_name())
            .ok_or_else(|| not_found(repo))
    }
}

fn not_found(repo: &RepoRef) -> FetchError {
    FetchError::Api {
        url: format!("fake://repos/{repo}"),
        status: 404,
        body: "Not Found".to_string(),
    }
}

fn injected_failure(repo: &RepoRef, what: &str) -> FetchError {
    FetchError::Api {
        url: format!("fake://repos/{repo}/{what}"),
        status: 500,
        body: format!("injected {what} failure"),
    }
}

#[async_trait::async_trait]
impl RepoHost for FakeHost {
    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, FetchError> {
        if self.fail_metadata.contains(&repo.full_name()) {
            return Err(injected_failure(repo, "metadata"));
        }
        Ok(self.data(repo)?.repository.clone())
    }

    async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>, FetchError> {
        if self.fail_issues.contains(&repo.full_name()) {
            return Err(injected_failure(repo, "issues"));
        }
        Ok(self.data(repo)?.issues.clone())
    }

    async fn list_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequest>, FetchError> {
        Ok(self.data(repo)?.pulls.clone())
    }

    async fn list_contributors(&self, repo: &RepoRef) -> Result<Vec<Contributor>, FetchError> {
        Ok(self.data(repo)?.contributors.clone())
    }

    async fn latest_release(&self, repo: &RepoRef) -> Result<Option<Release>, FetchError> {
        Ok(self.data(repo)?.release.clone())
    }

    async fn weekly_commit_activity(
        &self,
        repo: &RepoRef,
    ) -> Result<Vec<CommitActivityWeek>, FetchError> {
        Ok(self.data(repo)?.weeks.clone())
    }
}

/// Object store whose writes always fail; reads delegate to an inner
/// memory store so the repository list still loads.
#[derive(Debug, Default)]
pub struct FailingObjectStore {
    pub inner: MemoryObjectStore,
}

#[async_trait::async_trait]
impl ObjectStore for FailingObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.get_object(bucket, key).await
    }

    async fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("injected upload failure".to_string()))
    }
}

// ── Fixture builders ────────────────────────────────────────────────

/// Repository metadata with a recognizable shape.
pub fn sample_repository(stars: i64) -> Repository {
    Repository {
        description: Some("A sample repository".to_string()),
        stargazers_count: stars,
        forks_count: stars / 2,
        open_issues_count: 3,
        subscribers_count: 7,
        language: Some("Rust".to_string()),
        topics: vec!["sample".to_string()],
        size: 1024,
        created_at: Some("2020-01-01T00:00:00Z".to_string()),
        updated_at: Some("2026-01-01T00:00:00Z".to_string()),
        pushed_at: Some("2026-01-02T00:00:00Z".to_string()),
        ..Repository::default()
    }
}

pub fn issue(state: &str, created: &str, closed: Option<&str>, is_pr: bool) -> Issue {
    Issue {
        state: state.to_string(),
        created_at: created.to_string(),
        closed_at: closed.map(ToString::to_string),
        pull_request: is_pr.then(|| serde_json::json!({"url": "fake://pull"})),
    }
}

pub fn pull(
    state: &str,
    created: &str,
    closed: Option<&str>,
    merged: Option<&str>,
) -> PullRequest {
    PullRequest {
        state: state.to_string(),
        created_at: created.to_string(),
        closed_at: closed.map(ToString::to_string),
        merged_at: merged.map(ToString::to_string),
    }
}

pub fn weeks(totals: &[i64]) -> Vec<CommitActivityWeek> {
    totals
        .iter()
        .enumerate()
        .map(|(i, &total)| CommitActivityWeek {
            total,
            week: 1_700_000_000 + (i as i64) * 604_800,
        })
        .collect()
}

/// A fully populated repository, good for end-to-end assertions.
pub fn busy_repo_data() -> RepoData {
    RepoData {
        repository: sample_repository(100),
        issues: vec![
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-02T00:00:00Z"), false),
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-03T00:00:00Z"), true),
            issue("open", "2024-02-01T00:00:00Z", None, false),
        ],
        pulls: vec![
            pull(
                "closed",
                "2024-01-01T00:00:00Z",
                Some("2024-01-02T00:00:00Z"),
                Some("2024-01-02T00:00:00Z"),
            ),
            pull(
                "closed",
                "2024-01-01T00:00:00Z",
                Some("2024-01-03T00:00:00Z"),
                Some("2024-01-03T00:00:00Z"),
            ),
            pull("open", "2024-02-01T00:00:00Z", None, None),
        ],
        contributors: vec![
            Contributor {
                login: "alice".to_string(),
                contributions: 40,
            },
            Contributor {
                login: "bob".to_string(),
                contributions: 2,
            },
        ],
        release: Some(Release {
            name: Some("v1.2.0".to_string()),
            tag_name: Some("v1.2.0".to_string()),
            published_at: Some("2026-02-01T00:00:00Z".to_string()),
        }),
        weeks: weeks(&[1, 2, 3, 4, 5]),
    }
}

/// Seed the monitored-repository list under the default key.
pub fn seed_repo_list(store: &MemoryObjectStore, bucket: &str, repos: &[RepoRef]) {
    store.insert(
        bucket,
        pulse_core::config::DEFAULT_LIST_KEY,
        serde_json::to_vec(repos).unwrap(),
    );
}
