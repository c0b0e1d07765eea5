//! Metrics collection: fan out over the monitored repositories, fetch
//! each one's data from the hosting API, and derive insight records.

pub mod github;
pub mod host;
pub mod metrics;

use futures::StreamExt;
use tracing::{info, instrument, warn};

use crate::error::FetchError;
use crate::progress::ProgressReporter;
use crate::types::{InsightBatch, InsightRecord, RepoRef};

pub use github::GithubClient;
pub use host::RepoHost;

/// Collect one insight record per repository.
///
/// Repositories are processed through a bounded pool of `concurrency`
/// concurrent fetches; batch order is completion order. A repository
/// whose fetch fails in any way is logged and dropped — no partial
/// record — and collection continues for the rest. This operation never
/// fails as a whole: the worst systemic outcome (bad token, API down)
/// is an empty batch plus logged errors.
#[instrument(skip_all, fields(repos = repos.len()))]
pub async fn collect(
    host: &dyn RepoHost,
    repos: &[RepoRef],
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> InsightBatch {
    progress.begin(repos.len());

    let mut results = futures::stream::iter(
        repos
            .iter()
            .map(|repo| async move { (repo, collect_one(host, repo).await) }),
    )
    .buffer_unordered(concurrency.max(1));

    let mut batch = Vec::with_capacity(repos.len());
    let mut dropped = 0usize;
    while let Some((repo, result)) = results.next().await {
        let collected = result.is_ok();
        match result {
            Ok(record) => batch.push(record),
            Err(e) => {
                dropped += 1;
                warn!(repo = %repo, error = %e, "dropping repository from batch");
            }
        }
        progress.repo_done(repo, collected);
    }
    progress.finish();

    info!(collected = batch.len(), dropped, "collection complete");
    batch
}

/// Fetch everything for one repository and derive its record.
/// The metadata call and the five auxiliary calls run concurrently.
async fn collect_one(host: &dyn RepoHost, repo: &RepoRef) -> Result<InsightRecord, FetchError> {
    let (meta, issues, pulls, contributors, release, weeks) = tokio::try_join!(
        host.get_repository(repo),
        host.list_issues(repo),
        host.list_pull_requests(repo),
        host.list_contributors(repo),
        host.latest_release(repo),
        host.weekly_commit_activity(repo),
    )?;

    Ok(metrics::build_record(
        repo,
        &meta,
        &issues,
        &pulls,
        &contributors,
        release.as_ref(),
        &weeks,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::host::{CommitActivityWeek, Contributor, Issue, PullRequest, Release, Repository};
    use super::*;
    use crate::progress::NoopReporter;

    /// Minimal in-test host: every repository looks the same, except
    /// the ones listed in `fail`, whose metadata call errors.
    struct StaticHost {
        fail: HashSet<String>,
    }

    impl StaticHost {
        fn failing(repos: &[&str]) -> Self {
            Self {
                fail: repos.iter().map(ToString::to_string).collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl RepoHost for StaticHost {
        async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, FetchError> {
            if self.fail.contains(&repo.full_name()) {
                return Err(FetchError::Api {
                    url: format!("/repos/{repo}"),
                    status: 404,
                    body: "Not Found".to_string(),
                });
            }
            Ok(Repository {
                stargazers_count: 42,
                ..Repository::default()
            })
        }

        async fn list_issues(&self, _repo: &RepoRef) -> Result<Vec<Issue>, FetchError> {
            Ok(Vec::new())
        }

        async fn list_pull_requests(&self, _repo: &RepoRef) -> Result<Vec<PullRequest>, FetchError> {
            Ok(Vec::new())
        }

        async fn list_contributors(&self, _repo: &RepoRef) -> Result<Vec<Contributor>, FetchError> {
            Ok(vec![Contributor::default()])
        }

        async fn latest_release(&self, _repo: &RepoRef) -> Result<Option<Release>, FetchError> {
            Ok(None)
        }

        async fn weekly_commit_activity(
            &self,
            _repo: &RepoRef,
        ) -> Result<Vec<CommitActivityWeek>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn failing_repository_is_dropped_not_fatal() {
        let host = StaticHost::failing(&["bad/repo"]);
        let repos = vec![RepoRef::new("good", "repo"), RepoRef::new("bad", "repo")];
        let batch = collect(&host, &repos, 4, &NoopReporter).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].repo_name, "good/repo");
        assert_eq!(batch[0].stars, 42);
    }

    #[tokio::test]
    async fn every_record_maps_to_an_input_repo() {
        let host = StaticHost::failing(&[]);
        let repos: Vec<RepoRef> = (0..8).map(|i| RepoRef::new("org", format!("r{i}"))).collect();
        let batch = collect(&host, &repos, 3, &NoopReporter).await;
        assert_eq!(batch.len(), repos.len());
        let inputs: HashSet<String> = repos.iter().map(RepoRef::full_name).collect();
        for record in &batch {
            assert!(inputs.contains(&record.repo_name));
        }
    }

    #[tokio::test]
    async fn all_failures_yield_empty_batch() {
        let host = StaticHost::failing(&["a/a", "b/b"]);
        let repos = vec![RepoRef::new("a", "a"), RepoRef::new("b", "b")];
        let batch = collect(&host, &repos, 1, &NoopReporter).await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let host = StaticHost::failing(&[]);
        let repos = vec![RepoRef::new("o", "r")];
        let batch = collect(&host, &repos, 0, &NoopReporter).await;
        assert_eq!(batch.len(), 1);
    }
}
