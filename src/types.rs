//! Common types used throughout the pipeline
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Relations
// ============================================================================

/// The five relations of the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Fact table, one row per song play
    Songplays,
    /// User dimension
    Users,
    /// Song dimension
    Songs,
    /// Artist dimension
    Artists,
    /// Calendar dimension
    Time,
}

impl Relation {
    /// All relations, in write order
    pub const ALL: [Relation; 5] = [
        Relation::Songs,
        Relation::Artists,
        Relation::Users,
        Relation::Time,
        Relation::Songplays,
    ];

    /// Directory name of the relation under the output location
    pub fn name(self) -> &'static str {
        match self {
            Relation::Songplays => "songplays",
            Relation::Users => "users",
            Relation::Songs => "songs",
            Relation::Artists => "artists",
            Relation::Time => "time",
        }
    }

    /// Columns the relation is physically partitioned by
    pub fn partition_keys(self) -> &'static [&'static str] {
        match self {
            Relation::Songplays | Relation::Time => &["year", "month"],
            Relation::Users | Relation::Songs | Relation::Artists => &[],
        }
    }

    /// Whether the relation is written Hive-partitioned
    pub fn is_partitioned(self) -> bool {
        !self.partition_keys().is_empty()
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Raw Sources
// ============================================================================

/// The two raw inputs the pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Song catalog records
    SongData,
    /// User activity log records
    LogData,
}

impl SourceKind {
    /// Name used in logs, errors and default sub-paths
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::SongData => "song_data",
            SourceKind::LogData => "log_data",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
