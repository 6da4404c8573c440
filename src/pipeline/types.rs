//! Pipeline types
//!
//! Statistics reported at the end of a run.

use crate::output::WrittenRelation;
use crate::reader::ReadStats;
use crate::transform::TransformStats;
use crate::types::Relation;
use serde::Serialize;

/// Summary of a completed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Song catalog read statistics
    pub song_data: ReadStats,
    /// Activity log read statistics
    pub log_data: ReadStats,
    /// Records absorbed during transformation
    pub transform: TransformStats,
    /// Published relations, in write order
    pub relations: Vec<WrittenRelation>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Rows written for a relation, if it was published
    pub fn rows(&self, relation: Relation) -> Option<usize> {
        self.relations
            .iter()
            .find(|w| w.relation == relation)
            .map(|w| w.rows)
    }

    /// Total rows across all published relations
    pub fn total_rows(&self) -> usize {
        self.relations.iter().map(|w| w.rows).sum()
    }

    /// Total Parquet files across all published relations
    pub fn total_files(&self) -> usize {
        self.relations.iter().map(|w| w.files).sum()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
