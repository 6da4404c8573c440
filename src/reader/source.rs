//! Raw record source backed by an object store
//!
//! Lists every `.json` object below a location, fetches them with bounded
//! concurrency and decodes them into typed records. Listing order is sorted by
//! path, which makes record ordinals (and every "last observed wins" decision
//! built on them) reproducible across runs.

use super::parser::decode_body;
use super::types::RawRecord;
use crate::error::{Error, Result};
use crate::storage::StorageLocation;
use crate::types::SourceKind;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::path::Path as ObjectPath;
use object_store::ObjectMeta;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extension of the data files in a source
pub const DATA_EXTENSION: &str = ".json";

/// Statistics from reading one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    /// Files decoded
    pub files: usize,
    /// Records produced
    pub records: usize,
    /// Bytes fetched
    pub bytes: u64,
    /// Lines that were not JSON objects
    pub skipped_lines: usize,
    /// Files that could not be decoded at all
    pub skipped_files: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Records read from one source, in read order
#[derive(Debug, Clone)]
pub struct SourceBatch<T> {
    pub records: Vec<T>,
    pub stats: ReadStats,
}

/// A raw JSON source at a storage location
#[derive(Debug, Clone)]
pub struct RecordSource {
    kind: SourceKind,
    location: StorageLocation,
    concurrency: usize,
}

impl RecordSource {
    /// Create a source reading `.json` files below `location`
    pub fn new(kind: SourceKind, location: StorageLocation) -> Self {
        Self {
            kind,
            location,
            concurrency: 16,
        }
    }

    /// Set how many files are fetched at once
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    fn unavailable(&self, message: impl Into<String>) -> Error {
        Error::input_unavailable(self.kind.name(), self.location.url(), message)
    }

    /// List the data files of the source, sorted by path
    ///
    /// Objects whose path has a segment starting with `.` or `_` are ignored
    /// (checkpoints, markers, staging areas).
    pub async fn list_files(&self) -> Result<Vec<ObjectMeta>> {
        let listed: Vec<ObjectMeta> = self
            .location
            .store()
            .list(self.location.list_prefix())
            .try_collect()
            .await
            .map_err(|e| self.unavailable(format!("listing failed: {e}")))?;

        let mut files: Vec<ObjectMeta> = listed
            .into_iter()
            .filter(|meta| {
                is_data_file(&meta.location, self.location.list_prefix(), DATA_EXTENSION)
            })
            .collect();
        files.sort_by(|a, b| a.location.as_ref().cmp(b.location.as_ref()));

        if files.is_empty() {
            return Err(self.unavailable(format!("no {DATA_EXTENSION} files found")));
        }
        Ok(files)
    }

    /// Read and decode every record of the source
    pub async fn read<T: RawRecord>(&self) -> Result<SourceBatch<T>> {
        let start = Instant::now();
        let files = self.list_files().await?;
        info!(
            "Reading {} files from {} ({})",
            files.len(),
            self.kind,
            self.location.url()
        );

        let store = Arc::clone(self.location.store());
        let bodies: Vec<(ObjectPath, Bytes)> = futures::stream::iter(files.into_iter().map(
            |meta| {
                let store = Arc::clone(&store);
                async move {
                    let body = store.get(&meta.location).await?.bytes().await?;
                    Ok::<_, object_store::Error>((meta.location, body))
                }
            },
        ))
        .buffered(self.concurrency)
        .try_collect()
        .await
        .map_err(|e| self.unavailable(format!("fetch failed: {e}")))?;

        let mut stats = ReadStats::default();
        let mut records = Vec::new();
        let mut ordinal = 0u64;

        for (path, body) in bodies {
            stats.bytes += body.len() as u64;

            let Ok(text) = std::str::from_utf8(&body) else {
                warn!("Skipping {path}: not valid UTF-8");
                stats.skipped_files += 1;
                continue;
            };

            let decoded = decode_body(text);
            if decoded.skipped_lines > 0 {
                warn!("{path}: skipped {} malformed lines", decoded.skipped_lines);
            }
            stats.skipped_lines += decoded.skipped_lines;
            stats.files += 1;

            for obj in &decoded.objects {
                records.push(T::from_object(obj, ordinal));
                ordinal += 1;
            }
            debug!("{path}: {} records", decoded.objects.len());
        }

        stats.records = records.len();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Read {} records from {} ({} files, {} skipped lines, {} skipped files)",
            stats.records, self.kind, stats.files, stats.skipped_lines, stats.skipped_files
        );

        Ok(SourceBatch { records, stats })
    }
}

/// Whether a listed object is a data file of the source
///
/// Only the segments below the source prefix are checked.
fn is_data_file(path: &ObjectPath, prefix: Option<&ObjectPath>, extension: &str) -> bool {
    let is_hidden = |part: object_store::path::PathPart<'_>| {
        let part = part.as_ref();
        part.starts_with('.') || part.starts_with('_')
    };
    let hidden = match prefix.and_then(|prefix| path.prefix_match(prefix)) {
        Some(mut relative) => relative.any(is_hidden),
        None => path.parts().any(is_hidden),
    };
    !hidden && path.as_ref().ends_with(extension)
}
