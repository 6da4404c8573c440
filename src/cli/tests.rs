//! Tests for CLI module

use super::*;
use crate::config::CompressionCodec;
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;
use std::io::Write;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["songplay-lake"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_parse_defaults() {
    let cli = parse(&[]);
    assert!(cli.config.is_none());
    assert!(cli.input.is_none());
    assert_eq!(cli.format, OutputFormat::Json);
    assert!(!cli.verbose);
}

#[test]
fn test_parse_all_flags() {
    let cli = parse(&[
        "--input",
        "s3://udacity-dend",
        "--output",
        "s3://lake/out",
        "--compression",
        "zstd",
        "--read-concurrency",
        "4",
        "--format",
        "pretty",
        "-v",
    ]);
    assert_eq!(cli.input.as_deref(), Some("s3://udacity-dend"));
    assert_eq!(cli.output.as_deref(), Some("s3://lake/out"));
    assert_eq!(cli.compression, Some(CompressionCodec::Zstd));
    assert_eq!(cli.read_concurrency, Some(4));
    assert_eq!(cli.format, OutputFormat::Pretty);
    assert!(cli.verbose);
}

#[test]
fn test_parse_rejects_unknown_compression() {
    let result = Cli::try_parse_from(["songplay-lake", "--compression", "lz4"]);
    assert!(result.is_err());
}

#[test]
fn test_build_config_from_flags() {
    let cli = parse(&["--input", "/data/raw/", "--output", "/data/lake"]);
    let config = Runner::new(cli).build_config().unwrap();

    assert_eq!(config.input.song_data, "/data/raw/song_data");
    assert_eq!(config.input.log_data, "/data/raw/log_data");
    assert_eq!(config.output.destination, "/data/lake");
    assert_eq!(config.output.compression, CompressionCodec::Snappy);
}

#[test]
fn test_specific_source_overrides_input_base() {
    let cli = parse(&[
        "--input",
        "/data/raw",
        "--log-data",
        "/elsewhere/logs",
        "--output",
        "/data/lake",
    ]);
    let config = Runner::new(cli).build_config().unwrap();

    assert_eq!(config.input.song_data, "/data/raw/song_data");
    assert_eq!(config.input.log_data, "/elsewhere/logs");
}

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "input:\n  song_data: s3://bucket/song_data\n  log_data: s3://bucket/log_data\noutput:\n  destination: s3://bucket/lake\n  compression: gzip\n"
    )
    .unwrap();

    let path = file.path().to_string_lossy().to_string();
    let cli = parse(&["--config", &path, "--output", "/tmp/lake"]);
    let config = Runner::new(cli).build_config().unwrap();

    assert_eq!(config.input.song_data, "s3://bucket/song_data");
    assert_eq!(config.output.destination, "/tmp/lake");
    assert_eq!(config.output.compression, CompressionCodec::Gzip);
}

#[test]
fn test_build_config_requires_output() {
    let cli = parse(&["--input", "/data/raw"]);
    let result = Runner::new(cli).build_config();
    assert!(matches!(result, Err(Error::MissingConfigField { .. })));
}

#[test]
fn test_build_config_missing_file() {
    let cli = parse(&["--config", "/nonexistent/pipeline.yaml"]);
    let result = Runner::new(cli).build_config();
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}
