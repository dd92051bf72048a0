//! Run command

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing::info;

use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::{ArtifactSource, Pipeline, PipelineOptions};

/// Build every release and publish the artifacts
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Build and resolve everything but skip the uploads
    #[arg(long)]
    pub dry_run: bool,

    /// Do not wait for ENTER before removing the staging directory
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Stage artifacts into this directory and keep it
    #[arg(long, value_name = "DIR")]
    pub keep_staging: Option<PathBuf>,

    /// Do not publish to Modrinth
    #[arg(long)]
    pub skip_modrinth: bool,

    /// Do not publish to CurseForge
    #[arg(long)]
    pub skip_curseforge: bool,
}

impl RunCommand {
    /// Execute the run command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!(
            dry_run = self.dry_run,
            yes = self.yes,
            skip_modrinth = self.skip_modrinth,
            skip_curseforge = self.skip_curseforge,
            "executing run command"
        );
        let (config, config_path) = cli.load_config()?;

        if !cli.quiet && cli.format == OutputFormat::Text {
            output::info(&format!("Using {}", config_path.display()));
            if self.dry_run {
                output::warning("Dry run: nothing will be uploaded");
            }
        }

        let options = PipelineOptions {
            source: ArtifactSource::Build {
                keep: self.keep_staging.clone(),
            },
            publish: true,
            dry_run: self.dry_run,
            skip_modrinth: self.skip_modrinth,
            skip_curseforge: self.skip_curseforge,
        };

        let mut pipeline = Pipeline::new(&config, cli.credentials(), options);
        let outcome = pipeline.run();
        info!(state = ?pipeline.state(), "pipeline finished");
        Ok(ExitCode::from(super::finish(cli, outcome, !self.yes)?))
    }
}
