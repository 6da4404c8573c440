//! Relation sinks
//!
//! A sink takes the finished relations of one run and persists them. The
//! object store sink stages every file under `_staging/{run_id}/` and only
//! touches the published `{relation}/` directories once all relations are
//! staged. Publishing then moves the previous output of every relation into
//! `_staging/{run_id}/_previous/`, renames the new files into place and writes
//! the `_SUCCESS` markers last. If any step fails, the new files are removed
//! and the previous output is renamed back before the run reports failure.
//!
//! Object stores have no multi-key transaction: while a swap is in flight no
//! relation carries `_SUCCESS`, so readers must wait for the markers.

use super::partition::split_by_partition;
use super::schema::RelationBatch;
use super::writer::{encode_parquet, ParquetWriterConfig};
use crate::error::{Error, Result};
use crate::storage::StorageLocation;
use crate::types::Relation;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::PutPayload;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Name of the marker written into each published relation directory
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Directory that holds in-flight runs
pub const STAGING_DIR: &str = "_staging";

/// Directory under a run's staging area that holds the output it replaces
pub const PREVIOUS_DIR: &str = "_previous";

/// Summary of one published relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenRelation {
    pub relation: Relation,
    pub rows: usize,
    pub files: usize,
    pub partitions: usize,
    pub bytes: u64,
}

/// Destination of a run's relations
#[async_trait]
pub trait RelationSink: Send + Sync {
    /// Persist every relation, all or nothing
    async fn write_relations(&self, batches: &[RelationBatch]) -> Result<Vec<WrittenRelation>>;
}

/// A Parquet file waiting in the staging area
#[derive(Debug, Clone)]
struct StagedFile {
    /// Path relative to the relation directory
    relative: String,
    staged: ObjectPath,
}

#[derive(Debug)]
struct StagedRelation {
    files: Vec<StagedFile>,
    summary: WrittenRelation,
}

/// Every move made while publishing, so a failure can be undone
#[derive(Debug, Default)]
struct PublishJournal {
    /// `(published, backup)` pairs of previous output moved aside
    set_aside: Vec<(ObjectPath, ObjectPath)>,
    /// Objects this run wrote into the published directories
    placed: Vec<ObjectPath>,
}

/// Sink that writes Parquet files to an object store location
#[derive(Debug, Clone)]
pub struct ObjectStoreSink {
    location: StorageLocation,
    writer_config: ParquetWriterConfig,
    max_rows_per_file: usize,
    run_id: String,
}

impl ObjectStoreSink {
    /// Create a sink with a run id derived from the current time
    pub fn new(location: StorageLocation, writer_config: ParquetWriterConfig) -> Self {
        Self {
            location,
            writer_config,
            max_rows_per_file: 1_000_000,
            run_id: Utc::now().format("%Y%m%dT%H%M%S%3fZ").to_string(),
        }
    }

    /// Split partitions into files of at most this many rows
    #[must_use]
    pub fn with_max_rows_per_file(mut self, rows: usize) -> Self {
        self.max_rows_per_file = rows.max(1);
        self
    }

    /// Override the run id (names the staging directory)
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    fn staging_path(&self, relative: &str) -> ObjectPath {
        let run_dir = format!("{STAGING_DIR}/{}", self.run_id);
        self.location.child(&format!("{run_dir}/{relative}"))
    }

    /// Encode and upload one relation into the staging area
    async fn stage_relation(&self, relation_batch: &RelationBatch) -> Result<StagedRelation> {
        let relation = relation_batch.relation;
        let partitions = split_by_partition(&relation_batch.batch, relation.partition_keys())?;

        let mut files = Vec::new();
        let mut bytes_written = 0u64;

        for partition in &partitions {
            let rows = partition.batch.num_rows();
            // An unpartitioned relation always gets one file, even when empty
            let chunks = rows.div_ceil(self.max_rows_per_file).max(1);

            for chunk in 0..chunks {
                let offset = chunk * self.max_rows_per_file;
                let length = self.max_rows_per_file.min(rows.saturating_sub(offset));
                let slice = partition.batch.slice(offset, length);
                let body: Bytes = encode_parquet(&slice, &self.writer_config)?;

                let file_name = format!("part-{chunk:05}.parquet");
                let relative = if partition.dir.is_empty() {
                    file_name
                } else {
                    format!("{}/{file_name}", partition.dir)
                };
                let staged = self.staging_path(&format!("{}/{relative}", relation.name()));

                bytes_written += body.len() as u64;
                self.location
                    .store()
                    .put(&staged, PutPayload::from(body))
                    .await?;
                debug!("Staged {staged} ({} rows)", slice.num_rows());

                files.push(StagedFile { relative, staged });
            }
        }

        Ok(StagedRelation {
            summary: WrittenRelation {
                relation,
                rows: relation_batch.num_rows(),
                files: files.len(),
                partitions: if relation.is_partitioned() {
                    partitions.len()
                } else {
                    1
                },
                bytes: bytes_written,
            },
            files,
        })
    }

    /// Move every previous object of a relation into this run's backup area
    async fn set_aside(&self, relation: Relation, journal: &mut PublishJournal) -> Result<()> {
        let target = self.location.child(relation.name());
        let store = self.location.store();

        let previous: Vec<ObjectPath> = store
            .list(Some(&target))
            .map_ok(|meta| meta.location)
            .try_collect()
            .await?;

        for published in previous {
            let relative = match published.prefix_match(&target) {
                Some(parts) => parts.map(|p| p.as_ref().to_string()).collect::<Vec<_>>(),
                None => continue,
            };
            let backup = self.staging_path(&format!(
                "{PREVIOUS_DIR}/{}/{}",
                relation.name(),
                relative.join("/")
            ));
            store.rename(&published, &backup).await?;
            journal.set_aside.push((published, backup));
        }
        Ok(())
    }

    /// Rename the staged files of a relation into its published directory
    async fn place(&self, staged: &StagedRelation, journal: &mut PublishJournal) -> Result<()> {
        let relation = staged.summary.relation;
        let store = self.location.store();

        for file in &staged.files {
            let published = self
                .location
                .child(&format!("{}/{}", relation.name(), file.relative));
            journal.placed.push(published.clone());
            store.rename(&file.staged, &published).await?;
        }
        Ok(())
    }

    /// Mark a placed relation complete
    async fn mark_success(&self, relation: Relation, journal: &mut PublishJournal) -> Result<()> {
        let marker = self
            .location
            .child(&format!("{}/{SUCCESS_MARKER}", relation.name()));
        journal.placed.push(marker.clone());
        self.location
            .store()
            .put(&marker, PutPayload::from(Bytes::new()))
            .await?;
        Ok(())
    }

    /// Swap every staged relation into place
    ///
    /// All previous output is moved aside before any new file lands, and the
    /// `_SUCCESS` markers are written last. On error the relation being worked
    /// on is returned with the cause.
    async fn swap_in(
        &self,
        staged: &[StagedRelation],
        journal: &mut PublishJournal,
    ) -> std::result::Result<(), (Relation, Error)> {
        for relation in staged {
            let name = relation.summary.relation;
            self.set_aside(name, journal).await.map_err(|e| (name, e))?;
        }
        for relation in staged {
            let name = relation.summary.relation;
            self.place(relation, journal).await.map_err(|e| (name, e))?;
        }
        for relation in staged {
            let name = relation.summary.relation;
            self.mark_success(name, journal).await.map_err(|e| (name, e))?;
        }
        Ok(())
    }

    /// Undo a partial swap: drop what this run placed, restore what it moved aside
    ///
    /// Returns `false` when some previous object could not be restored; it is
    /// then still under the backup area of the staging directory.
    async fn roll_back(&self, journal: &PublishJournal) -> bool {
        let store = self.location.store();

        for path in journal.placed.iter().rev() {
            match store.delete(path).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => warn!("Failed to remove {path} during rollback: {e}"),
            }
        }

        let mut restored = true;
        for (published, backup) in journal.set_aside.iter().rev() {
            if let Err(e) = store.rename(backup, published).await {
                error!("Failed to restore {published} from {backup}: {e}");
                restored = false;
            }
        }
        restored
    }

    /// Remove everything left under this run's staging directory
    async fn cleanup_staging(&self) {
        let staging = self.staging_path("");
        let store = self.location.store();
        let leftovers: std::result::Result<Vec<ObjectPath>, _> = store
            .list(Some(&staging))
            .map_ok(|meta| meta.location)
            .try_collect()
            .await;

        match leftovers {
            Ok(paths) => {
                for path in paths {
                    if let Err(e) = store.delete(&path).await {
                        warn!("Failed to remove staged file {path}: {e}");
                    }
                }
            }
            Err(e) => warn!("Failed to list staging directory {staging}: {e}"),
        }
    }
}

#[async_trait]
impl RelationSink for ObjectStoreSink {
    async fn write_relations(&self, batches: &[RelationBatch]) -> Result<Vec<WrittenRelation>> {
        info!(
            "Staging {} relations under {}/{STAGING_DIR}/{}",
            batches.len(),
            self.location.url(),
            self.run_id
        );

        let mut staged = Vec::with_capacity(batches.len());
        for batch in batches {
            match self.stage_relation(batch).await {
                Ok(relation) => staged.push(relation),
                Err(e) => {
                    self.cleanup_staging().await;
                    return Err(Error::write_failure(batch.relation.name(), e.to_string()));
                }
            }
        }

        let mut journal = PublishJournal::default();
        if let Err((relation, e)) = self.swap_in(&staged, &mut journal).await {
            if self.roll_back(&journal).await {
                self.cleanup_staging().await;
                return Err(Error::write_failure(relation.name(), e.to_string()));
            }
            let backup = self.staging_path(PREVIOUS_DIR);
            return Err(Error::write_failure(
                relation.name(),
                format!("{e}; previous output could not be fully restored, see {backup}"),
            ));
        }

        for relation in &staged {
            info!(
                "Published {}: {} rows in {} files ({} bytes)",
                relation.summary.relation,
                relation.summary.rows,
                relation.summary.files,
                relation.summary.bytes
            );
        }

        self.cleanup_staging().await;
        Ok(staged.into_iter().map(|s| s.summary).collect())
    }
}
