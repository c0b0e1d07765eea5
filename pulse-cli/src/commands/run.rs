use std::path::PathBuf;

use clap::Args;
use pulse_core::config::PulseConfig;
use pulse_core::job::CollectionJob;
use pulse_core::progress::IndicatifReporter;
use pulse_core::store::{EnvSecretStore, FsObjectStore};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root directory of the local object store (buckets live under it)
    #[arg(long, env = "PULSE_STORE_ROOT", default_value = ".")]
    pub store_root: PathBuf,

    /// Secret identifier: environment variable holding the JSON token payload
    #[arg(long, env = "PULSE_SECRET_ID")]
    pub secret_id: Option<String>,

    /// Destination bucket for the repository list and insight output
    #[arg(long, env = "PULSE_BUCKET")]
    pub bucket: Option<String>,

    /// Object key of the monitored-repository list
    #[arg(long, env = "PULSE_LIST_KEY")]
    pub list_key: Option<String>,

    /// Key prefix for written insight objects
    #[arg(long, env = "PULSE_PREFIX")]
    pub prefix: Option<String>,

    /// Maximum repositories collected concurrently
    #[arg(long, env = "PULSE_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Hosting API base URL
    #[arg(long, env = "PULSE_API_BASE")]
    pub api_base: Option<String>,
}

impl RunArgs {
    fn into_config(self) -> PulseConfig {
        let mut config = PulseConfig::default();
        if let Some(secret_id) = self.secret_id {
            config.secret_id = secret_id;
        }
        if let Some(bucket) = self.bucket {
            config.bucket = bucket;
        }
        if let Some(list_key) = self.list_key {
            config.list_key = list_key;
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(api_base) = self.api_base {
            config.api_base = api_base;
        }
        config
    }
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let store_root = args.store_root.clone();
    let config = args.into_config();

    let secrets = EnvSecretStore::new();
    let objects = FsObjectStore::new(store_root);
    let job = CollectionJob::new(&config, &secrets, &objects);

    let report = job.run(&IndicatifReporter::new()).await?;

    println!(
        "Collected {} repositories ({} dropped)",
        report.collected, report.dropped
    );
    println!("Wrote {}/{}", config.bucket, report.object_key);
    Ok(())
}
