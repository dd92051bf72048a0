//! Configuration validation

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::artifacts::{contains_token_run, is_token_separator};
use crate::error::{ConfigError, Result};

use super::credentials::Credentials;
use super::defaults::{CURSEFORGE_TOKEN_ENV, MODRINTH_TOKEN_ENV};
use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_project(config)?;
    validate_build(config)?;
    validate_targets(config)?;
    validate_releases(config)?;
    validate_platforms(config)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Check that every enabled platform has a token
pub fn validate_credentials(config: &Config, credentials: &Credentials) -> Result<()> {
    if config.modrinth.enabled && credentials.modrinth_token.is_none() {
        return Err(ConfigError::MissingCredential {
            platform: "Modrinth",
            variable: MODRINTH_TOKEN_ENV,
        }
        .into());
    }

    if config.curseforge.enabled && credentials.curseforge_token.is_none() {
        return Err(ConfigError::MissingCredential {
            platform: "CurseForge",
            variable: CURSEFORGE_TOKEN_ENV,
        }
        .into());
    }

    Ok(())
}

fn validate_project(config: &Config) -> Result<()> {
    if config.project.version.trim().is_empty() {
        return Err(ConfigError::invalid("project.version", "version cannot be empty").into());
    }

    let template = &config.project.file_name_format;
    let stem = Path::new(template)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for placeholder in ["{loader}", "{mc_version}"] {
        if !stem.contains(placeholder) {
            return Err(ConfigError::invalid(
                "project.file_name_format",
                format!("must contain {} placeholder before the extension", placeholder),
            )
            .into());
        }

        if !is_delimited(&stem, placeholder) {
            return Err(ConfigError::invalid(
                "project.file_name_format",
                format!(
                    "{} must be separated from its neighbours by a character such as '-' or '_'",
                    placeholder
                ),
            )
            .into());
        }
    }

    Ok(())
}

/// Whether every occurrence of `placeholder` is bounded by separators or the stem's ends,
/// so its rendered value stays a run of whole tokens
fn is_delimited(stem: &str, placeholder: &str) -> bool {
    let bounded = |c: Option<char>| c.map_or(true, |c| is_token_separator(c) && c != '{' && c != '}');

    stem.match_indices(placeholder).all(|(i, _)| {
        let before = stem[..i].chars().next_back();
        let after = stem[i + placeholder.len()..].chars().next();
        bounded(before) && bounded(after)
    })
}

fn validate_build(config: &Config) -> Result<()> {
    if config.build.command.is_empty() || config.build.command[0].is_empty() {
        return Err(ConfigError::invalid("build.command", "command cannot be empty").into());
    }

    if config.build.git.is_empty() {
        return Err(ConfigError::invalid("build.git", "git executable cannot be empty").into());
    }

    Ok(())
}

fn validate_targets(config: &Config) -> Result<()> {
    if config.targets.is_empty() {
        return Err(ConfigError::invalid("targets", "at least one target is required").into());
    }

    let known_versions: HashSet<&str> = config.releases.iter().map(|r| r.version.as_str()).collect();

    for (i, target) in config.targets.iter().enumerate() {
        if target.folder.trim().is_empty() {
            return Err(
                ConfigError::invalid(format!("targets[{}].folder", i), "folder cannot be empty")
                    .into(),
            );
        }

        if target.loaders.is_empty() || target.loaders.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::invalid(
                format!("targets[{}].loaders", i),
                "at least one non-empty loader tag is required",
            )
            .into());
        }

        for (j, other) in config.targets.iter().enumerate().skip(i + 1) {
            if contains_token_run(&other.folder, &target.folder)
                || contains_token_run(&target.folder, &other.folder)
            {
                return Err(ConfigError::invalid(
                    format!("targets[{}].folder", j),
                    format!(
                        "'{}' cannot be told apart from '{}' in staged file names",
                        other.folder, target.folder
                    ),
                )
                .into());
            }
        }

        if let Some(versions) = &target.versions {
            for version in versions {
                if !known_versions.contains(version.as_str()) {
                    warn!(
                        target = %target.folder,
                        version = %version,
                        "target lists a version with no matching release"
                    );
                }
            }
        }
    }

    Ok(())
}

fn validate_releases(config: &Config) -> Result<()> {
    if config.releases.is_empty() {
        return Err(ConfigError::invalid("releases", "at least one release is required").into());
    }

    for (i, release) in config.releases.iter().enumerate() {
        if release.branch.trim().is_empty() {
            return Err(
                ConfigError::invalid(format!("releases[{}].branch", i), "branch cannot be empty")
                    .into(),
            );
        }

        if release.version.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("releases[{}].version", i),
                "version cannot be empty",
            )
            .into());
        }

        for (j, other) in config.releases.iter().enumerate().skip(i + 1) {
            if contains_token_run(&other.version, &release.version)
                || contains_token_run(&release.version, &other.version)
            {
                return Err(ConfigError::invalid(
                    format!("releases[{}].version", j),
                    format!(
                        "'{}' cannot be told apart from '{}' in staged file names",
                        other.version, release.version
                    ),
                )
                .into());
            }
        }
    }

    Ok(())
}

fn validate_platforms(config: &Config) -> Result<()> {
    if config.modrinth.enabled && config.modrinth.project_id.trim().is_empty() {
        return Err(ConfigError::invalid(
            "modrinth.project_id",
            "required when Modrinth publishing is enabled",
        )
        .into());
    }

    if config.curseforge.enabled {
        let id = config.curseforge.project_id.trim();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::invalid(
                "curseforge.project_id",
                "must be the numeric project ID when CurseForge publishing is enabled",
            )
            .into());
        }

        for (i, release) in config.releases.iter().enumerate() {
            if release.major_minor().is_none() {
                return Err(ConfigError::invalid(
                    format!("releases[{}].version", i),
                    "CurseForge needs a major.minor[.patch] version",
                )
                .into());
            }
        }
    }

    Ok(())
}
