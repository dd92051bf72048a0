//! Plan command

use std::process::ExitCode;

use clap::Args;
use console::style;
use tracing::info;

use modship_core::EffectiveMatrix;

use crate::cli::{output, Cli, OutputFormat};

/// Show the effective build matrix
#[derive(Debug, Args)]
pub struct PlanCommand {}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<ExitCode> {
        info!("executing plan command");
        let (config, config_path) = cli.load_config()?;
        let matrix = EffectiveMatrix::from_config(&config);

        let platforms: Vec<&str> = [
            (config.modrinth.enabled, "modrinth"),
            (config.curseforge.enabled, "curseforge"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();

        match cli.format {
            OutputFormat::Json => {
                let releases: Vec<_> = matrix
                    .groups()
                    .iter()
                    .map(|group| {
                        let targets: Vec<_> = group
                            .targets
                            .iter()
                            .map(|target| {
                                serde_json::json!({
                                    "folder": target.folder,
                                    "loaders": target.loaders,
                                    "file_name": config.file_name(group.release, target),
                                    "display_name": config.display_name(group.release, target),
                                })
                            })
                            .collect();
                        serde_json::json!({
                            "branch": group.release.branch,
                            "version": group.release.version,
                            "toolchain": group.release.toolchain,
                            "targets": targets,
                        })
                    })
                    .collect();
                let output = serde_json::json!({
                    "config_path": config_path,
                    "mod_version": config.project.version,
                    "channel": config.project.channel,
                    "platforms": platforms,
                    "cells": matrix.len(),
                    "releases": releases,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", output::header("Build plan"));
                println!("{}", output::key_value("Config", &config_path.display().to_string()));
                println!(
                    "{}",
                    output::key_value(
                        "Mod version",
                        &output::version_style().apply_to(&config.project.version).to_string()
                    )
                );
                println!("{}", output::key_value("Channel", config.project.channel.as_str()));
                let platforms = if platforms.is_empty() {
                    "none".to_string()
                } else {
                    platforms.join(", ")
                };
                println!("{}", output::key_value("Platforms", &platforms));
                println!();

                for group in matrix.groups() {
                    println!(
                        "{} {} {}",
                        style(&group.release.branch).bold(),
                        style("→").dim(),
                        output::version_style().apply_to(&group.release.version)
                    );
                    if let Some(toolchain) = &group.release.toolchain {
                        println!(
                            "{}",
                            output::key_value(&config.build.toolchain_env, &toolchain.display().to_string())
                        );
                    }
                    if group.targets.is_empty() {
                        println!("  {}", style("no targets apply").yellow());
                    }
                    for target in &group.targets {
                        println!(
                            "  {} [{}] {}",
                            output::path_style().apply_to(config.file_name(group.release, target)),
                            target.loaders.join(", "),
                            style(config.display_name(group.release, target)).dim()
                        );
                    }
                }

                println!();
                println!("{} artifact(s) will be built", matrix.len());
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
