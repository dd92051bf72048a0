//! Publish command

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing::info;

use crate::cli::Cli;
use crate::pipeline::{ArtifactSource, Pipeline, PipelineOptions};

/// Publish artifacts staged by an earlier build
#[derive(Debug, Args)]
pub struct PublishCommand {
    /// Directory holding the staged jars
    #[arg(short, long, value_name = "DIR")]
    pub staging: PathBuf,

    /// Resolve everything but skip the uploads
    #[arg(long)]
    pub dry_run: bool,

    /// Do not publish to Modrinth
    #[arg(long)]
    pub skip_modrinth: bool,

    /// Do not publish to CurseForge
    #[arg(long)]
    pub skip_curseforge: bool,
}

impl PublishCommand {
    /// Execute the publish command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!(
            staging = %self.staging.display(),
            dry_run = self.dry_run,
            "executing publish command"
        );
        let (config, _) = cli.load_config()?;

        let options = PipelineOptions {
            source: ArtifactSource::Staged(self.staging.clone()),
            publish: true,
            dry_run: self.dry_run,
            skip_modrinth: self.skip_modrinth,
            skip_curseforge: self.skip_curseforge,
        };

        let outcome = Pipeline::new(&config, cli.credentials(), options).run();
        Ok(ExitCode::from(super::finish(cli, outcome, false)?))
    }
}
