//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use modship_core::config::{load_config, load_config_from_dir, Config, Credentials};

use commands::{
    BuildCommand, InitCommand, PlanCommand, PublishCommand, RunCommand, ValidateCommand,
};

/// modship - build Minecraft mods across release branches and publish them
#[derive(Debug, Parser)]
#[command(name = "modship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search upwards for modship.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Modrinth personal access token
    #[arg(long, global = true, env = "MODRINTH_TOKEN", hide_env_values = true)]
    pub modrinth_token: Option<String>,

    /// CurseForge API token
    #[arg(long, global = true, env = "CURSEFORGE_TOKEN", hide_env_values = true)]
    pub curseforge_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build every release and publish the artifacts
    Run(RunCommand),

    /// Build every release into a directory without publishing
    Build(BuildCommand),

    /// Publish artifacts staged by an earlier build
    Publish(PublishCommand),

    /// Show the effective build matrix
    Plan(PlanCommand),

    /// Validate configuration and credentials
    Validate(ValidateCommand),

    /// Write a starter configuration
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Run(ref cmd) => cmd.execute(&self),
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Publish(ref cmd) => cmd.execute(&self),
            Commands::Plan(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or search from the working directory
    pub fn load_config(&self) -> anyhow::Result<(Config, PathBuf)> {
        match &self.config {
            Some(path) => Ok((load_config(path)?, path.clone())),
            None => {
                let cwd = std::env::current_dir()?;
                Ok(load_config_from_dir(&cwd)?)
            }
        }
    }

    /// Tokens from the environment or the command line
    pub fn credentials(&self) -> Credentials {
        Credentials::from_env()
            .with_overrides(self.modrinth_token.clone(), self.curseforge_token.clone())
    }

    /// Directory commands write into by default
    pub fn working_dir(&self) -> anyhow::Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}

/// Display a path relative to the working directory when possible
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
