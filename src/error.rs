//! Error types for the songplay lake pipeline
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record anomalies (missing optional fields, join misses) never surface
//! here; they are absorbed where they happen and only show up in run stats.

use thiserror::Error;

/// The main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Input '{source_name}' unavailable at {location}: {message}")]
    InputUnavailable {
        source_name: String,
        location: String,
        message: String,
    },

    #[error("Input '{source_name}' contains no records")]
    EmptyInput { source_name: String },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Transform '{stage}' failed: {message}")]
    Transform { stage: String, message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Failed to write relation '{relation}': {message}")]
    WriteFailure { relation: String, message: String },

    // ============================================================================
    // Storage / I/O Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an input unavailable error
    pub fn input_unavailable(
        source_name: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InputUnavailable {
            source_name: source_name.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(source_name: impl Into<String>) -> Self {
        Self::EmptyInput {
            source_name: source_name.into(),
        }
    }

    /// Create a transform error
    pub fn transform(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a write failure for a named relation
    pub fn write_failure(relation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailure {
            relation: relation.into(),
            message: message.into(),
        }
    }

    /// Whether the error happened before any output could have been staged
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InputUnavailable { .. } | Error::EmptyInput { .. }
        )
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
