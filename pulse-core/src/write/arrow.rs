//! Fixed Arrow schema for insight batches and Parquet encoding.
//!
//! Column names keep the camelCase spellings of the catalog contract —
//! downstream queries address them verbatim.

use std::sync::Arc;

use arrow_array::builder::{ListBuilder, StringBuilder};
use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::ArrowWriter;

use crate::error::WriteError;
use crate::types::InsightRecord;

/// The fixed output schema: strings as Utf8, counts as Int64, averages
/// as Float64, `topics` as a string list, plus the injected run `date`.
pub fn insight_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("repoName", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("stars", DataType::Int64, false),
        Field::new("forks", DataType::Int64, false),
        Field::new("openIssues", DataType::Int64, false),
        Field::new("closedIssues", DataType::Int64, false),
        Field::new("openPullRequests", DataType::Int64, false),
        Field::new("mergedPullRequests", DataType::Int64, false),
        Field::new("closedPullRequests", DataType::Int64, false),
        Field::new("watchers", DataType::Int64, false),
        Field::new("language", DataType::Utf8, false),
        Field::new("license", DataType::Utf8, false),
        Field::new_list("topics", Field::new("item", DataType::Utf8, true), false),
        Field::new("size", DataType::Int64, false),
        Field::new("createdAt", DataType::Utf8, false),
        Field::new("updatedAt", DataType::Utf8, false),
        Field::new("pushedAt", DataType::Utf8, false),
        Field::new("latestRelease", DataType::Utf8, false),
        Field::new("latestReleaseDate", DataType::Utf8, false),
        Field::new("contributorsCount", DataType::Int64, false),
        Field::new("commitsLastWeek", DataType::Int64, false),
        Field::new("commitsLastMonth", DataType::Int64, false),
        Field::new("averageTimeToMergePR", DataType::Float64, false),
        Field::new("averageTimeToClosePR", DataType::Float64, false),
        Field::new("averageTimeToCloseIssue", DataType::Float64, false),
        Field::new("date", DataType::Utf8, false),
    ]))
}

/// Serialize a batch to Parquet bytes, injecting `run_date` into every row.
pub fn encode_batch(batch: &[InsightRecord], run_date: &str) -> Result<Vec<u8>, WriteError> {
    let schema = insight_schema();
    let record_batch = to_record_batch(&schema, batch, run_date)?;

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None)?;
    writer.write(&record_batch)?;
    writer.close()?;
    Ok(buf)
}

fn to_record_batch(
    schema: &SchemaRef,
    batch: &[InsightRecord],
    run_date: &str,
) -> Result<RecordBatch, WriteError> {
    let mut topics = ListBuilder::new(StringBuilder::new());
    for record in batch {
        for topic in &record.topics {
            topics.values().append_value(topic);
        }
        topics.append(true);
    }

    let columns: Vec<ArrayRef> = vec![
        string_col(batch, |r| &r.repo_name),
        string_col(batch, |r| &r.description),
        int_col(batch, |r| r.stars),
        int_col(batch, |r| r.forks),
        int_col(batch, |r| r.open_issues),
        int_col(batch, |r| r.closed_issues),
        int_col(batch, |r| r.open_pull_requests),
        int_col(batch, |r| r.merged_pull_requests),
        int_col(batch, |r| r.closed_pull_requests),
        int_col(batch, |r| r.watchers),
        string_col(batch, |r| &r.language),
        string_col(batch, |r| &r.license),
        Arc::new(topics.finish()),
        int_col(batch, |r| r.size),
        string_col(batch, |r| &r.created_at),
        string_col(batch, |r| &r.updated_at),
        string_col(batch, |r| &r.pushed_at),
        string_col(batch, |r| &r.latest_release),
        string_col(batch, |r| &r.latest_release_date),
        int_col(batch, |r| r.contributors_count),
        int_col(batch, |r| r.commits_last_week),
        int_col(batch, |r| r.commits_last_month),
        float_col(batch, |r| r.average_time_to_merge_pr),
        float_col(batch, |r| r.average_time_to_close_pr),
        float_col(batch, |r| r.average_time_to_close_issue),
        Arc::new(StringArray::from_iter_values(
            batch.iter().map(|_| run_date),
        )),
    ];

    Ok(RecordBatch::try_new(Arc::clone(schema), columns)?)
}

fn string_col<'a>(
    batch: &'a [InsightRecord],
    get: impl Fn(&'a InsightRecord) -> &'a str,
) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(batch.iter().map(get)))
}

fn int_col(batch: &[InsightRecord], get: impl Fn(&InsightRecord) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(batch.iter().map(get)))
}

fn float_col(batch: &[InsightRecord], get: impl Fn(&InsightRecord) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(batch.iter().map(get)))
}
