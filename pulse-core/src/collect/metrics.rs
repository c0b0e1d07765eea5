//! Pure derivation of insight metrics from fetched collections.
//!
//! Everything here is a deterministic function of its inputs: rerunning
//! a derivation over the same fetched data produces an identical record.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]

use chrono::DateTime;
use tracing::debug;

use crate::types::{InsightRecord, RepoRef};

use super::host::{CommitActivityWeek, Contributor, Issue, PullRequest, Release, Repository};

/// License display name when the repository reports none.
const NO_LICENSE: &str = "No License";
/// Release name when the repository has no releases.
const NO_RELEASES: &str = "No releases";
/// Number of weekly buckets summed into "last month".
const MONTH_WEEKS: usize = 4;

/// Closed issues, excluding pull-request-backed entries.
pub fn closed_issue_count(issues: &[Issue]) -> i64 {
    issues
        .iter()
        .filter(|i| !i.is_pull_request() && i.state == "closed")
        .count() as i64
}

pub fn open_pull_request_count(pulls: &[PullRequest]) -> i64 {
    pulls.iter().filter(|p| p.state == "open").count() as i64
}

pub fn merged_pull_request_count(pulls: &[PullRequest]) -> i64 {
    pulls.iter().filter(|p| p.merged_at.is_some()).count() as i64
}

/// Pull requests closed without being merged.
pub fn closed_pull_request_count(pulls: &[PullRequest]) -> i64 {
    pulls
        .iter()
        .filter(|p| p.state == "closed" && p.merged_at.is_none())
        .count() as i64
}

/// Total of the most recent weekly bucket; 0 when the sequence is empty.
pub fn commits_last_week(weeks: &[CommitActivityWeek]) -> i64 {
    weeks.last().map_or(0, |w| w.total)
}

/// Sum of the most recent (up to) four weekly buckets.
pub fn commits_last_month(weeks: &[CommitActivityWeek]) -> i64 {
    weeks.iter().rev().take(MONTH_WEEKS).map(|w| w.total).sum()
}

/// Mean elapsed hours from creation to merge over merged pull requests.
pub fn average_time_to_merge_pr(pulls: &[PullRequest]) -> f64 {
    rounded_mean_hours(pulls.iter().filter_map(|p| {
        let merged = p.merged_at.as_deref()?;
        hours_between(&p.created_at, merged)
    }))
}

/// Mean elapsed hours from creation to close over unmerged closed PRs.
pub fn average_time_to_close_pr(pulls: &[PullRequest]) -> f64 {
    rounded_mean_hours(
        pulls
            .iter()
            .filter(|p| p.state == "closed" && p.merged_at.is_none())
            .filter_map(|p| {
                let closed = p.closed_at.as_deref()?;
                hours_between(&p.created_at, closed)
            }),
    )
}

/// Mean elapsed hours from creation to close over closed non-PR issues.
pub fn average_time_to_close_issue(issues: &[Issue]) -> f64 {
    rounded_mean_hours(
        issues
            .iter()
            .filter(|i| !i.is_pull_request() && i.state == "closed")
            .filter_map(|i| {
                let closed = i.closed_at.as_deref()?;
                hours_between(&i.created_at, closed)
            }),
    )
}

/// Elapsed hours between two RFC 3339 timestamps.
/// Unparseable pairs are skipped from the mean, not treated as zero.
fn hours_between(start: &str, end: &str) -> Option<f64> {
    let start = DateTime::parse_from_rfc3339(start)
        .inspect_err(|e| debug!(start, error = %e, "unparseable timestamp"))
        .ok()?;
    let end = DateTime::parse_from_rfc3339(end)
        .inspect_err(|e| debug!(end, error = %e, "unparseable timestamp"))
        .ok()?;
    Some((end - start).num_seconds() as f64 / 3600.0)
}

/// Mean of the given hour spans, rounded to the nearest whole hour.
/// 0 for an empty sequence.
fn rounded_mean_hours(hours: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = hours.collect();
    if collected.is_empty() {
        return 0.0;
    }
    let mean = collected.iter().sum::<f64>() / collected.len() as f64;
    mean.round()
}

/// Assemble one insight record from a repository's fetched data.
pub fn build_record(
    repo: &RepoRef,
    meta: &Repository,
    issues: &[Issue],
    pulls: &[PullRequest],
    contributors: &[Contributor],
    release: Option<&Release>,
    weeks: &[CommitActivityWeek],
) -> InsightRecord {
    if weeks.is_empty() {
        debug!(%repo, "no commit activity buckets, defaulting to 0");
    }

    let (latest_release, latest_release_date) = match release {
        Some(r) => (
            r.name
                .clone()
                .filter(|n| !n.is_empty())
                .or_else(|| r.tag_name.clone())
                .unwrap_or_default(),
            r.published_at.clone().unwrap_or_default(),
        ),
        None => (NO_RELEASES.to_string(), String::new()),
    };

    InsightRecord {
        repo_name: repo.full_name(),
        description: meta.description.clone().unwrap_or_default(),
        stars: meta.stargazers_count,
        forks: meta.forks_count,
        open_issues: meta.open_issues_count,
        closed_issues: closed_issue_count(issues),
        open_pull_requests: open_pull_request_count(pulls),
        merged_pull_requests: merged_pull_request_count(pulls),
        closed_pull_requests: closed_pull_request_count(pulls),
        watchers: meta.subscribers_count,
        language: meta.language.clone().unwrap_or_default(),
        license: meta
            .license
            .as_ref()
            .map_or_else(|| NO_LICENSE.to_string(), |l| l.name.clone()),
        topics: meta.topics.clone(),
        size: meta.size,
        created_at: meta.created_at.clone().unwrap_or_default(),
        updated_at: meta.updated_at.clone().unwrap_or_default(),
        pushed_at: meta.pushed_at.clone().unwrap_or_default(),
        latest_release,
        latest_release_date,
        contributors_count: contributors.len() as i64,
        commits_last_week: commits_last_week(weeks),
        commits_last_month: commits_last_month(weeks),
        average_time_to_merge_pr: average_time_to_merge_pr(pulls),
        average_time_to_close_pr: average_time_to_close_pr(pulls),
        average_time_to_close_issue: average_time_to_close_issue(issues),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pull(state: &str, created: &str, closed: Option<&str>, merged: Option<&str>) -> PullRequest {
        PullRequest {
            state: state.to_string(),
            created_at: created.to_string(),
            closed_at: closed.map(ToString::to_string),
            merged_at: merged.map(ToString::to_string),
        }
    }

    fn issue(state: &str, created: &str, closed: Option<&str>, is_pr: bool) -> Issue {
        Issue {
            state: state.to_string(),
            created_at: created.to_string(),
            closed_at: closed.map(ToString::to_string),
            pull_request: is_pr.then(|| serde_json::json!({"url": "x"})),
        }
    }

    fn weeks(totals: &[i64]) -> Vec<CommitActivityWeek> {
        totals
            .iter()
            .map(|&total| CommitActivityWeek { total, week: 0 })
            .collect()
    }

    #[test]
    fn closed_issue_count_excludes_pull_requests() {
        let issues = vec![
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-02T00:00:00Z"), false),
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-02T00:00:00Z"), true),
            issue("open", "2024-01-01T00:00:00Z", None, false),
        ];
        assert_eq!(closed_issue_count(&issues), 1);
    }

    #[test]
    fn pull_request_counts_partition_by_state() {
        let pulls = vec![
            pull("open", "2024-01-01T00:00:00Z", None, None),
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
                None,
            ),
        ];
        assert_eq!(open_pull_request_count(&pulls), 1);
        assert_eq!(merged_pull_request_count(&pulls), 1);
        assert_eq!(closed_pull_request_count(&pulls), 1);
    }

    #[test]
    fn commit_windows_default_to_zero() {
        assert_eq!(commits_last_week(&[]), 0);
        assert_eq!(commits_last_month(&[]), 0);
    }

    #[test]
    fn commit_windows_use_newest_buckets() {
        let weeks = weeks(&[1, 2, 3, 4, 5]);
        assert_eq!(commits_last_week(&weeks), 5);
        assert_eq!(commits_last_month(&weeks), 14);
    }

    #[test]
    fn commit_month_with_fewer_than_four_buckets() {
        let weeks = weeks(&[7, 9]);
        assert_eq!(commits_last_week(&weeks), 9);
        assert_eq!(commits_last_month(&weeks), 16);
    }

    #[test]
    fn merge_time_is_zero_when_nothing_merged() {
        let pulls = vec![pull("open", "2024-01-01T00:00:00Z", None, None)];
        assert_eq!(average_time_to_merge_pr(&pulls), 0.0);
        assert_eq!(average_time_to_merge_pr(&[]), 0.0);
    }

    #[test]
    fn merge_time_is_rounded_mean_hours() {
        // 24h and 48h gaps: mean 36.
        let pulls = vec![
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
        ];
        assert_eq!(average_time_to_merge_pr(&pulls), 36.0);
    }

    #[test]
    fn close_time_ignores_merged_pull_requests() {
        let pulls = vec![
            pull(
                "closed",
                "2024-01-01T00:00:00Z",
                Some("2024-01-05T00:00:00Z"),
                Some("2024-01-05T00:00:00Z"),
            ),
            pull(
                "closed",
                "2024-01-01T00:00:00Z",
                Some("2024-01-02T12:00:00Z"),
                None,
            ),
        ];
        // Only the unmerged PR counts: 36h.
        assert_eq!(average_time_to_close_pr(&pulls), 36.0);
    }

    #[test]
    fn issue_close_time_skips_pr_backed_issues() {
        let issues = vec![
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-02T00:00:00Z"), false),
            issue("closed", "2024-01-01T00:00:00Z", Some("2024-01-09T00:00:00Z"), true),
        ];
        assert_eq!(average_time_to_close_issue(&issues), 24.0);
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        let pulls = vec![
            pull("closed", "not a date", Some("x"), Some("also not")),
            pull(
                "closed",
                "2024-01-01T00:00:00Z",
                Some("2024-01-02T00:00:00Z"),
                Some("2024-01-02T00:00:00Z"),
            ),
        ];
        assert_eq!(average_time_to_merge_pr(&pulls), 24.0);
    }

    #[test]
    fn build_record_applies_defaults() {
        let repo = RepoRef::new("octo", "empty");
        let meta = Repository::default();
        let record = build_record(&repo, &meta, &[], &[], &[], None, &[]);
        assert_eq!(record.repo_name, "octo/empty");
        assert_eq!(record.description, "");
        assert_eq!(record.language, "");
        assert_eq!(record.license, "No License");
        assert_eq!(record.latest_release, "No releases");
        assert_eq!(record.latest_release_date, "");
        assert_eq!(record.commits_last_week, 0);
        assert_eq!(record.commits_last_month, 0);
        assert_eq!(record.average_time_to_merge_pr, 0.0);
    }

    #[test]
    fn build_record_prefers_release_name_over_tag() {
        let repo = RepoRef::new("o", "r");
        let named = Release {
            name: Some("v1.0 — Launch".to_string()),
            tag_name: Some("v1.0.0".to_string()),
            published_at: Some("2024-06-01T00:00:00Z".to_string()),
        };
        let record = build_record(&repo, &Repository::default(), &[], &[], &[], Some(&named), &[]);
        assert_eq!(record.latest_release, "v1.0 — Launch");
        assert_eq!(record.latest_release_date, "2024-06-01T00:00:00Z");

        let unnamed = Release {
            name: None,
            tag_name: Some("v2.0.0".to_string()),
            published_at: None,
        };
        let record =
            build_record(&repo, &Repository::default(), &[], &[], &[], Some(&unnamed), &[]);
        assert_eq!(record.latest_release, "v2.0.0");
    }

    // ── Property tests ──────────────────────────────────────────────

    fn arb_timestamp() -> impl Strategy<Value = String> {
        (0i64..3650, 0i64..24).prop_map(|(day, hour)| {
            let base = DateTime::parse_from_rfc3339("2015-01-01T00:00:00Z").unwrap();
            (base + chrono::Duration::days(day) + chrono::Duration::hours(hour)).to_rfc3339()
        })
    }

    fn arb_pull() -> impl Strategy<Value = PullRequest> {
        (arb_timestamp(), arb_timestamp(), any::<bool>(), any::<bool>()).prop_map(
            |(created, ended, closed, merged)| PullRequest {
                state: if closed { "closed" } else { "open" }.to_string(),
                created_at: created,
                closed_at: closed.then(|| ended.clone()),
                merged_at: (closed && merged).then(|| ended),
            },
        )
    }

    fn arb_issue() -> impl Strategy<Value = Issue> {
        (arb_timestamp(), arb_timestamp(), any::<bool>(), any::<bool>()).prop_map(
            |(created, ended, closed, is_pr)| Issue {
                state: if closed { "closed" } else { "open" }.to_string(),
                created_at: created,
                closed_at: closed.then_some(ended),
                pull_request: is_pr.then(|| serde_json::json!({})),
            },
        )
    }

    proptest! {
        #[test]
        fn derivation_is_idempotent(
            issues in proptest::collection::vec(arb_issue(), 0..20),
            pulls in proptest::collection::vec(arb_pull(), 0..20),
            totals in proptest::collection::vec(0i64..500, 0..10),
        ) {
            let repo = RepoRef::new("o", "r");
            let meta = Repository::default();
            let buckets = weeks(&totals);
            let first = build_record(&repo, &meta, &issues, &pulls, &[], None, &buckets);
            let second = build_record(&repo, &meta, &issues, &pulls, &[], None, &buckets);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn pull_counts_partition_the_input(
            pulls in proptest::collection::vec(arb_pull(), 0..30),
        ) {
            // States are only "open" or "closed", and merged PRs are
            // closed, so the three counts cover every PR exactly once.
            let total = open_pull_request_count(&pulls)
                + merged_pull_request_count(&pulls)
                + closed_pull_request_count(&pulls);
            prop_assert_eq!(total, pulls.len() as i64);
        }
    }
}
