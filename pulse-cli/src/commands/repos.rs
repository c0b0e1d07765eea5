use std::path::PathBuf;

use clap::Args;
use pulse_core::config;
use pulse_core::repolist;
use pulse_core::store::FsObjectStore;

#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Root directory of the local object store
    #[arg(long, env = "PULSE_STORE_ROOT", default_value = ".")]
    pub store_root: PathBuf,

    /// Bucket holding the repository list
    #[arg(long, env = "PULSE_BUCKET", default_value = "")]
    pub bucket: String,

    /// Object key of the monitored-repository list
    #[arg(long, env = "PULSE_LIST_KEY", default_value = config::DEFAULT_LIST_KEY)]
    pub list_key: String,
}

/// Print the effective repository list for the next run.
///
/// Runs through the same loader as the collection job, so a broken or
/// missing list shows the degrade-to-default substitution here too.
pub async fn run(args: ReposArgs) -> anyhow::Result<()> {
    let store = FsObjectStore::new(args.store_root);
    let repos = repolist::load_repositories(&store, &args.bucket, &args.list_key).await;

    for repo in &repos {
        println!("{repo}");
    }
    Ok(())
}
