//! Build command

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing::info;

use crate::cli::Cli;
use crate::pipeline::{ArtifactSource, Pipeline, PipelineOptions};

/// Build every release into a directory without publishing
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Directory to stage the artifacts in
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!(output = %self.output.display(), "executing build command");
        let (config, _) = cli.load_config()?;

        let options = PipelineOptions {
            source: ArtifactSource::Build {
                keep: Some(self.output.clone()),
            },
            publish: false,
            ..PipelineOptions::default()
        };

        let outcome = Pipeline::new(&config, cli.credentials(), options).run();
        Ok(ExitCode::from(super::finish(cli, outcome, false)?))
    }
}
