//! CLI runner - executes a pipeline run

use crate::cli::commands::{Cli, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, RunSummary};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the pipeline and print its summary
    pub async fn run(&self) -> Result<()> {
        let config = self.build_config()?;
        info!(
            "Running pipeline: {} + {} -> {}",
            config.input.song_data, config.input.log_data, config.output.destination
        );

        let summary = match Pipeline::new(config).run().await {
            Ok(summary) => summary,
            Err(e) => {
                if e.is_input_error() {
                    warn!("Run aborted before any output was staged");
                }
                return Err(e);
            }
        };
        self.output_summary(&summary)?;
        Ok(())
    }

    /// Load the config file, if any, and apply flag overrides
    pub fn build_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(base) = &self.cli.input {
            config = config.with_input_base(base);
        }
        if let Some(song_data) = &self.cli.song_data {
            config.input.song_data.clone_from(song_data);
        }
        if let Some(log_data) = &self.cli.log_data {
            config.input.log_data.clone_from(log_data);
        }
        if let Some(output) = &self.cli.output {
            config.output.destination.clone_from(output);
        }
        if let Some(compression) = self.cli.compression {
            config.output.compression = compression;
        }
        if let Some(concurrency) = self.cli.read_concurrency {
            config.input.read_concurrency = concurrency;
        }

        config.validate()?;
        Ok(config)
    }

    /// Print the run summary
    fn output_summary(&self, summary: &RunSummary) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(summary)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(summary)?,
        };
        println!("{text}");
        Ok(())
    }
}
