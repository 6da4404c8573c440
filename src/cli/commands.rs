//! CLI arguments

use crate::config::CompressionCodec;
use clap::Parser;
use std::path::PathBuf;

/// Build the songplay star schema from raw song and activity JSON
#[derive(Parser, Debug)]
#[command(name = "songplay-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Base input location; song_data/ and log_data/ are read beneath it
    /// Supports: /path, file:///path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Song catalog location (overrides --input)
    #[arg(long)]
    pub song_data: Option<String>,

    /// Activity log location (overrides --input)
    #[arg(long)]
    pub log_data: Option<String>,

    /// Output location for the five relations
    #[arg(short, long)]
    pub output: Option<String>,

    /// Parquet compression codec
    #[arg(long)]
    pub compression: Option<CompressionCodec>,

    /// Maximum number of files fetched at once per source
    #[arg(long)]
    pub read_concurrency: Option<usize>,

    /// Format of the run summary
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (single line)
    Json,
    /// Human-readable output
    Pretty,
}
