//! CLI module
//!
//! Command-line interface for running the pipeline. There are no
//! subcommands: every invocation is one batch run, configured from an
//! optional config file plus flag overrides.

mod commands;
mod runner;

pub use commands::{Cli, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
