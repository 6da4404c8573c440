//! Pipeline module
//!
//! Wires the reader, the transforms and the writer into one run.
//!
//! # Overview
//!
//! - `Pipeline` - Runs the full batch from a `PipelineConfig`
//! - `RunSummary` - What was read, absorbed and published
//!
//! Both sources are read concurrently. Songs/Artists, Users and Time are then
//! built concurrently on the blocking pool over shared read-only inputs, and
//! Songplays follows once Songs/Artists exist. Nothing is published unless every
//! relation was built and staged.

mod types;

pub use types::RunSummary;

use crate::config::PipelineConfig;
use crate::error::{Error, Result, ResultExt};
use crate::output::{star_schema_batches, ObjectStoreSink, ParquetWriterConfig, RelationSink};
use crate::reader::{ActivityRecord, RecordSource, SongRecord};
use crate::storage::StorageLocation;
use crate::transform::build_star_schema;
use crate::types::SourceKind;
use std::time::Instant;
use tracing::{debug, info};

/// Batch pipeline from raw JSON to the Parquet star schema
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline for a configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Resolve the configured locations and run
    pub async fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;

        let song_source = self.open_source(SourceKind::SongData, &self.config.input.song_data)?;
        let log_source = self.open_source(SourceKind::LogData, &self.config.input.log_data)?;

        let destination =
            StorageLocation::parse(&self.config.output.destination, &self.config.storage, true)?;
        let sink = ObjectStoreSink::new(destination, ParquetWriterConfig::from(&self.config.output))
            .with_max_rows_per_file(self.config.output.max_rows_per_file);

        self.run_with(&song_source, &log_source, &sink).await
    }

    fn open_source(&self, kind: SourceKind, url: &str) -> Result<RecordSource> {
        let location = StorageLocation::parse(url, &self.config.storage, false)
            .map_err(|e| Error::input_unavailable(kind.name(), url, e.to_string()))?;
        debug!("Reading {kind} from {} ({})", location.url(), location.scheme());
        Ok(RecordSource::new(kind, location).with_concurrency(self.config.input.read_concurrency))
    }

    /// Run against explicit sources and sink
    pub async fn run_with(
        &self,
        song_source: &RecordSource,
        log_source: &RecordSource,
        sink: &dyn RelationSink,
    ) -> Result<RunSummary> {
        let start = Instant::now();

        let (songs, events) = tokio::try_join!(
            song_source.read::<SongRecord>(),
            log_source.read::<ActivityRecord>()
        )?;

        if events.records.is_empty() {
            return Err(Error::empty_input(SourceKind::LogData.name()));
        }

        let (schema, transform) = build_star_schema(songs.records, events.records).await?;
        info!(
            "Built star schema: {} songs, {} artists, {} users, {} time, {} songplays ({} matched)",
            schema.songs.len(),
            schema.artists.len(),
            schema.users.len(),
            schema.time.len(),
            schema.songplays.len(),
            transform.plays_matched
        );

        let batches = star_schema_batches(&schema).context("Failed to build relation batches")?;
        let relations = sink.write_relations(&batches).await?;

        let mut summary = RunSummary {
            song_data: songs.stats,
            log_data: events.stats,
            transform,
            relations,
            duration_ms: 0,
        };
        summary.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Run complete: {} rows in {} files ({}ms)",
            summary.total_rows(),
            summary.total_files(),
            summary.duration_ms
        );
        Ok(summary)
    }
}
