//! The collection job: one ObtainToken → BuildClient → LoadRepositories
//! → Collect → Write cycle per invocation.

use std::fmt;

use tracing::{info, instrument};

use crate::collect::{GithubClient, RepoHost};
use crate::config::PulseConfig;
use crate::error::Result;
use crate::progress::ProgressReporter;
use crate::store::{ObjectStore, SecretStore};
use crate::write::InsightWriter;
use crate::{auth, collect, repolist};

/// Outcome of one collection run.
///
/// The run exit status treats any written batch as success, including a
/// partial one; `dropped` is the only place that distinguishes
/// "wrote N of M" from "wrote all M". Callers that care should log it.
#[derive(Debug)]
pub struct RunReport {
    /// Repositories that produced a record.
    pub collected: usize,
    /// Repositories dropped after fetch failures.
    pub dropped: usize,
    /// Object key of the written Parquet file.
    pub object_key: String,
}

/// Orchestrates one collection run over the store seams.
pub struct CollectionJob<'a> {
    config: &'a PulseConfig,
    secrets: &'a dyn SecretStore,
    objects: &'a dyn ObjectStore,
}

impl fmt::Debug for CollectionJob<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionJob")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> CollectionJob<'a> {
    pub fn new(
        config: &'a PulseConfig,
        secrets: &'a dyn SecretStore,
        objects: &'a dyn ObjectStore,
    ) -> Self {
        Self {
            config,
            secrets,
            objects,
        }
    }

    /// Run once against the real GitHub API.
    ///
    /// Configuration, token, and write failures abort the run;
    /// per-repository fetch failures only shrink the batch.
    #[instrument(skip_all, name = "collection_run")]
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<RunReport> {
        self.config.validate()?;

        let token = auth::fetch_token(self.secrets, &self.config.secret_id).await?;
        let client =
            GithubClient::new(Some(token)).with_base_url(self.config.api_base.clone());
        self.run_with_host(&client, progress).await
    }

    /// Run once against an arbitrary [`RepoHost`] implementation.
    pub async fn run_with_host(
        &self,
        host: &dyn RepoHost,
        progress: &dyn ProgressReporter,
    ) -> Result<RunReport> {
        self.config.validate()?;

        let repos =
            repolist::load_repositories(self.objects, &self.config.bucket, &self.config.list_key)
                .await;

        let batch = collect::collect(host, &repos, self.config.concurrency, progress).await;

        let writer = InsightWriter::new(self.objects, &self.config.bucket, &self.config.prefix);
        let object_key = writer.write(&batch).await?;

        let report = RunReport {
            collected: batch.len(),
            dropped: repos.len().saturating_sub(batch.len()),
            object_key,
        };
        info!(
            collected = report.collected,
            dropped = report.dropped,
            key = %report.object_key,
            "run complete"
        );
        Ok(report)
    }
}
