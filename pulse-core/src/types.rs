use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one monitored repository as `{owner}/{repo}`.
///
/// Sourced from the repository list at the start of each run; never
/// persisted by this system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// The `"{owner}/{repo}"` form used as `repoName` in the output.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// One repository's computed metrics for one run.
///
/// All fields are derived once from a repository's fetched data and are
/// read-only afterwards. The run's `date` column is injected at write
/// time and is deliberately not part of this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightRecord {
    /// `"{owner}/{repo}"`.
    pub repo_name: String,
    /// Repository description, empty if absent.
    pub description: String,
    pub stars: i64,
    pub forks: i64,
    pub open_issues: i64,
    /// Closed issues, excluding pull-request-backed issues.
    pub closed_issues: i64,
    pub open_pull_requests: i64,
    /// Pull requests with a non-null merge timestamp.
    pub merged_pull_requests: i64,
    /// Pull requests closed without being merged.
    pub closed_pull_requests: i64,
    /// Subscriber count from repository metadata.
    pub watchers: i64,
    /// Primary language, empty if the API reports none.
    pub language: String,
    /// License display name, `"No License"` when absent.
    pub license: String,
    pub topics: Vec<String>,
    pub size: i64,
    pub created_at: String,
    pub updated_at: String,
    pub pushed_at: String,
    /// Most recent release name, `"No releases"` when none exists.
    pub latest_release: String,
    pub latest_release_date: String,
    pub contributors_count: i64,
    /// Most recent weekly commit-activity bucket total.
    pub commits_last_week: i64,
    /// Sum of the most recent four weekly buckets.
    pub commits_last_month: i64,
    /// Mean hours from creation to merge, rounded; 0 if nothing merged.
    pub average_time_to_merge_pr: f64,
    /// Mean hours from creation to close for unmerged closed PRs.
    pub average_time_to_close_pr: f64,
    /// Mean hours from creation to close for non-PR issues.
    pub average_time_to_close_issue: f64,
}

/// The ordered set of insight records produced by one run, written as a
/// single Parquet object.
pub type InsightBatch = Vec<InsightRecord>;
