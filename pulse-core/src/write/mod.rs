//! Columnar writer: one date-partitioned Parquet object per run.

pub mod arrow;

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Result, WriteError};
use crate::store::ObjectStore;
use crate::types::InsightBatch;

pub use arrow::{encode_batch, insight_schema};

/// Content type recorded for uploaded Parquet objects.
pub const PARQUET_CONTENT_TYPE: &str = "application/vnd.apache.parquet";

/// Writes insight batches under `{prefix}/year=/month=/day=/` keys.
///
/// Every run produces a distinct object — the key embeds the write
/// instant, so two runs on the same UTC day land side by side in the
/// same day partition. Write failures are fatal to the run.
pub struct InsightWriter<'a> {
    store: &'a dyn ObjectStore,
    bucket: String,
    prefix: String,
}

impl fmt::Debug for InsightWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightWriter")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl<'a> InsightWriter<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Write the batch at the current UTC instant. Returns the object key.
    pub async fn write(&self, batch: &InsightBatch) -> Result<String> {
        self.write_at(batch, Utc::now()).await
    }

    /// Write the batch as of an explicit instant (tests pin this).
    pub async fn write_at(&self, batch: &InsightBatch, now: DateTime<Utc>) -> Result<String> {
        if self.bucket.is_empty() {
            return Err(WriteError::BucketNotConfigured.into());
        }

        let key = object_key(&self.prefix, now);
        let run_date = now.format("%Y-%m-%d").to_string();
        let bytes = encode_batch(batch, &run_date)?;
        let size = bytes.len();

        self.store
            .put_object(&self.bucket, &key, bytes, PARQUET_CONTENT_TYPE)
            .await
            .map_err(WriteError::Upload)?;

        info!(
            bucket = %self.bucket,
            key = %key,
            rows = batch.len(),
            size,
            "wrote insight batch"
        );
        Ok(key)
    }
}

/// Deterministic per-run destination key:
/// `{prefix}/year=YYYY/month=MM/day=DD/insights_<compact UTC stamp>.parquet`.
pub fn object_key(prefix: &str, now: DateTime<Utc>) -> String {
    format!(
        "{prefix}/year={}/month={}/day={}/insights_{}.parquet",
        now.format("%Y"),
        now.format("%m"),
        now.format("%d"),
        now.format("%Y%m%dT%H%M%SZ"),
    )
}
