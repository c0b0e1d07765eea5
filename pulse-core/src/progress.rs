//! Per-repository progress reporting for collection runs.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::RepoRef;

/// Observes a collection run as repositories complete.
///
/// The CLI plugs in an `indicatif` bar; library callers default to
/// [`NoopReporter`].
pub trait ProgressReporter: Send + Sync {
    /// A run over `total` repositories is starting.
    fn begin(&self, total: usize);

    /// One repository finished; `collected` is false when it was dropped.
    fn repo_done(&self, repo: &RepoRef, collected: bool);

    /// The run is over.
    fn finish(&self);
}

/// Silent reporter for library and test callers.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn begin(&self, _total: usize) {}
    fn repo_done(&self, _repo: &RepoRef, _collected: bool) {}
    fn finish(&self) {}
}

/// Terminal progress bar; dropped repositories are echoed above it.
#[derive(Debug, Default)]
pub struct IndicatifReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for IndicatifReporter {
    fn begin(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} collecting [{bar:30.cyan/blue}] {pos}/{len} repos ({eta})",
            )
            .unwrap()
            .progress_chars("=> "),
        );
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn repo_done(&self, repo: &RepoRef, collected: bool) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            if !collected {
                bar.println(format!("dropped {repo}"));
            }
            bar.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
