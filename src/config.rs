//! Pipeline configuration
//!
//! Configuration is an explicit value handed to the pipeline entry point.
//! It can be loaded from a YAML (or JSON) file and then overridden from the
//! command line. Nothing in the library reads ambient global state except the
//! object store builders, which fall back to the standard cloud environment
//! variables when a credential is left unset.
//!
//! ```yaml
//! input:
//!   song_data: s3://udacity-dend/song_data
//!   log_data: s3://udacity-dend/log_data
//! output:
//!   destination: s3://sparkify-lake/
//!   compression: snappy
//! storage:
//!   region: us-west-2
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw input locations
    #[serde(default)]
    pub input: InputConfig,

    /// Output location and format settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Storage backend credentials
    #[serde(default)]
    pub storage: StorageConfig,
}

impl PipelineConfig {
    /// Create a config reading from `song_data`/`log_data` and writing to `destination`
    pub fn new(
        song_data: impl Into<String>,
        log_data: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            input: InputConfig {
                song_data: song_data.into(),
                log_data: log_data.into(),
                ..InputConfig::default()
            },
            output: OutputConfig {
                destination: destination.into(),
                ..OutputConfig::default()
            },
            storage: StorageConfig::default(),
        }
    }

    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!("Failed to read config file {}: {e}", path.display()))
            }
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML or JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        // YAML is a superset of JSON, so one parser covers both
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Point both inputs at the conventional sub-directories of `base`
    #[must_use]
    pub fn with_input_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.input.song_data = format!("{base}/song_data");
        self.input.log_data = format!("{base}/log_data");
        self
    }

    /// Check that every required value is present and sane
    pub fn validate(&self) -> Result<()> {
        if self.input.song_data.trim().is_empty() {
            return Err(Error::missing_field("input.song_data"));
        }
        if self.input.log_data.trim().is_empty() {
            return Err(Error::missing_field("input.log_data"));
        }
        if self.output.destination.trim().is_empty() {
            return Err(Error::missing_field("output.destination"));
        }
        if self.input.read_concurrency == 0 {
            return Err(Error::invalid_value(
                "input.read_concurrency",
                "must be at least 1",
            ));
        }
        if self.output.max_rows_per_file == 0 {
            return Err(Error::invalid_value(
                "output.max_rows_per_file",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Input
// ============================================================================

/// Locations of the two raw sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Location of the song catalog files
    #[serde(default)]
    pub song_data: String,

    /// Location of the activity log files
    #[serde(default)]
    pub log_data: String,

    /// Maximum number of files fetched at once per source
    #[serde(default = "default_read_concurrency")]
    pub read_concurrency: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            song_data: String::new(),
            log_data: String::new(),
            read_concurrency: default_read_concurrency(),
        }
    }
}

fn default_read_concurrency() -> usize {
    16
}

// ============================================================================
// Output
// ============================================================================

/// Where and how relations are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base location for the five relations
    #[serde(default)]
    pub destination: String,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// Upper bound on rows in a single part file
    #[serde(default = "default_max_rows_per_file")]
    pub max_rows_per_file: usize,

    /// Dictionary-encode columns
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Write column chunk statistics
    #[serde(default = "default_true")]
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: String::new(),
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
            max_rows_per_file: default_max_rows_per_file(),
            dictionary: true,
            statistics: true,
        }
    }
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

fn default_max_rows_per_file() -> usize {
    1_000_000
}

fn default_true() -> bool {
    true
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    /// Snappy (default)
    #[default]
    Snappy,
    /// Zstandard
    Zstd,
    /// Gzip
    Gzip,
    /// No compression
    None,
}

// ============================================================================
// Storage
// ============================================================================

/// Credentials and endpoint settings for the object store backend
///
/// Unset values fall back to the provider's standard environment variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// AWS access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// AWS secret access key
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// AWS session token
    #[serde(default)]
    pub session_token: Option<String>,

    /// Bucket region
    #[serde(default)]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint (MinIO, R2, ...)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Allow plain HTTP endpoints
    #[serde(default)]
    pub allow_http: bool,
}
