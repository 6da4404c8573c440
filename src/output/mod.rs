//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Declared Arrow schemas of the five relations and row conversion
//! - Hive-style year/month partition splitting
//! - Writing Parquet files
//! - Staged, all-or-nothing publishing to an object store location

mod partition;
mod schema;
mod sink;
mod writer;

pub use partition::{build_partition_dir, split_by_partition, PartitionBatch, DEFAULT_PARTITION};
pub use schema::{
    artists_batch, relation_schema, songplays_batch, songs_batch, star_schema_batches,
    time_batch, users_batch, RelationBatch,
};
pub use sink::{
    ObjectStoreSink, RelationSink, WrittenRelation, PREVIOUS_DIR, STAGING_DIR, SUCCESS_MARKER,
};
pub use writer::{encode_parquet, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
