//! Pulse core library — collects public GitHub repository metrics and
//! persists them as date-partitioned Parquet batches in object storage.
//!
//! The main entry point is [`job::CollectionJob`], which runs one
//! ObtainToken → BuildClient → LoadRepositories → Collect → Write cycle
//! over the [`store::SecretStore`] and [`store::ObjectStore`] seams.

pub mod auth;
pub mod collect;
pub mod config;
pub mod error;
pub mod job;
pub mod progress;
pub mod repolist;
pub mod store;
pub mod types;
pub mod write;
