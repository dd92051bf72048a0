//! Init command

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use modship_core::config::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};

use crate::cli::Cli;

/// Write a starter configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Fail instead of prompting when the file exists
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let config_path = match &self.output {
            Some(path) => path.clone(),
            None => cli.working_dir()?.join(DEFAULT_CONFIG_TOML),
        };

        // Check if config already exists
        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(ExitCode::SUCCESS);
            }
        }

        write_template(&config_path)?;

        if !cli.quiet {
            println!(
                "{} Created configuration at {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to list your targets and releases", config_path.display());
            println!("  2. Export MODRINTH_TOKEN and/or CURSEFORGE_TOKEN");
            println!("  3. Run {} to verify your setup", style("modship validate").cyan());
            println!("  4. Run {} to build and publish", style("modship run").cyan());
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(())
}
