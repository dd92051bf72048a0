//! Validate command

use std::process::ExitCode;

use clap::Args;
use console::style;
use tracing::info;

use modship_build::check_prerequisites;
use modship_core::config::validate_credentials;

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate configuration and credentials
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate the configuration file
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        // Loading also validates the configuration
        let (config, config_path) = match cli.load_config() {
            Ok((c, p)) => (Some(c), Some(p)),
            Err(e) => {
                errors.push(format!("Configuration: {:#}", e));
                (None, None)
            }
        };

        if let Some(ref cfg) = config {
            if !self.config_only {
                if let Err(e) = validate_credentials(cfg, &cli.credentials()) {
                    errors.push(format!("Credentials: {}", e));
                }

                if let Err(e) = check_prerequisites(cfg) {
                    errors.push(format!("Tools: {}", e));
                }
            }

            if !cfg.publishes() {
                warnings.push("No publishing platform is enabled".to_string());
            }

            if !cfg.project.changelog.is_file() {
                warnings.push(format!(
                    "Changelog {} does not exist",
                    cfg.project.changelog.display()
                ));
            }
        }

        // If strict, promote warnings to errors
        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", style("Validation Results").bold());
                    println!();

                    if let Some(path) = config_path {
                        println!("Config: {}", style(path.display()).cyan());
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        if warnings.is_empty() {
                            println!("{}", style("✓ All checks passed").green().bold());
                        } else {
                            println!(
                                "{} with {} warning(s)",
                                style("✓ Validation passed").green().bold(),
                                warnings.len()
                            );
                        }
                    } else {
                        println!(
                            "{} with {} error(s)",
                            style("✗ Validation failed").red().bold(),
                            errors.len()
                        );
                    }
                }
            }
        }

        if !passed {
            return Ok(ExitCode::from(exit_codes::ERROR));
        }

        Ok(ExitCode::SUCCESS)
    }
}
