//! Run pipeline
//!
//! A run walks a fixed sequence of stages and stops at the first failure:
//!
//! 1. validate configuration and credentials
//! 2. check external tools
//! 3. read the changelog
//! 4. build every release into the staging area, or scan an existing one
//! 5. publish to each enabled platform, Modrinth first
//!
//! The staging area lives as long as the returned outcome. A temporary one is
//! removed when the outcome is dropped.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use tracing::{error, info, instrument, warn};

use modship_build::{ArtifactBuilder, BuildOrchestrator};
use modship_core::config::{load_changelog, validate_config, validate_credentials};
use modship_core::{ArtifactIndex, Config, Credentials, EffectiveMatrix};
use modship_stores::{Platform, PublishContext, PublishReport, PublisherRegistry};

use crate::exit_codes;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Prerequisites,
    Changelog,
    Build,
    Publish(Platform),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validate => write!(f, "validate"),
            Stage::Prerequisites => write!(f, "prerequisites"),
            Stage::Changelog => write!(f, "changelog"),
            Stage::Build => write!(f, "build"),
            Stage::Publish(platform) => write!(f, "publish to {}", platform),
        }
    }
}

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(Stage),
    Succeeded,
    Failed(Stage),
}

/// Where artifacts come from
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Build every release; stage into the given directory or a temporary one
    Build { keep: Option<PathBuf> },
    /// Reuse a directory staged by an earlier build
    Staged(PathBuf),
}

/// Run options
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source: ArtifactSource,
    pub publish: bool,
    pub dry_run: bool,
    pub skip_modrinth: bool,
    pub skip_curseforge: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source: ArtifactSource::Build { keep: None },
            publish: true,
            dry_run: false,
            skip_modrinth: false,
            skip_curseforge: false,
        }
    }
}

/// Directory holding staged artifacts
#[derive(Debug)]
pub enum StagingArea {
    /// Removed on drop
    Temporary(TempDir),
    /// Owned by the caller
    Kept(PathBuf),
}

impl StagingArea {
    /// Create a temporary staging area, or use (and create) the given directory
    pub fn create(keep: Option<&Path>) -> std::io::Result<Self> {
        match keep {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Ok(Self::Kept(dir.to_path_buf()))
            }
            None => Ok(Self::Temporary(
                tempfile::Builder::new().prefix("modship-").tempdir()?,
            )),
        }
    }

    /// Staging directory
    pub fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Kept(dir) => dir,
        }
    }

    /// Whether the directory is removed on drop
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

/// Result of a run
#[derive(Debug)]
pub enum PipelineOutcome {
    Succeeded {
        staging: StagingArea,
        index: ArtifactIndex,
        reports: Vec<PublishReport>,
    },
    Failed {
        stage: Stage,
        error: anyhow::Error,
    },
}

impl PipelineOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Succeeded { .. } => exit_codes::SUCCESS,
            Self::Failed { .. } => exit_codes::ERROR,
        }
    }
}

/// Builds and publishes one configuration
pub struct Pipeline<'a> {
    config: &'a Config,
    credentials: Credentials,
    options: PipelineOptions,
    builder: Box<dyn ArtifactBuilder + 'a>,
    registry: Option<PublisherRegistry>,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that builds with the configured git and build tool
    pub fn new(config: &'a Config, credentials: Credentials, options: PipelineOptions) -> Self {
        Self {
            config,
            credentials,
            options,
            builder: Box::new(BuildOrchestrator::new(config)),
            registry: None,
            state: PipelineState::Idle,
        }
    }

    /// Use a different artifact builder
    pub fn with_builder(mut self, builder: Box<dyn ArtifactBuilder + 'a>) -> Self {
        self.builder = builder;
        self
    }

    /// Use a prepared publisher registry instead of one derived from the configuration
    #[cfg(test)]
    pub fn with_registry(mut self, registry: PublisherRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run every stage
    #[instrument(skip(self), fields(dry_run = self.options.dry_run, publish = self.options.publish))]
    pub fn run(&mut self) -> PipelineOutcome {
        let started = Instant::now();

        match self.run_stages() {
            Ok((staging, index, reports)) => {
                self.state = PipelineState::Succeeded;
                info!(
                    artifacts = index.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "pipeline succeeded"
                );
                PipelineOutcome::Succeeded {
                    staging,
                    index,
                    reports,
                }
            }
            Err(error) => {
                let stage = match self.state {
                    PipelineState::Running(stage) => stage,
                    _ => Stage::Validate,
                };
                self.state = PipelineState::Failed(stage);
                error!(stage = %stage, error = %error, "pipeline failed");
                PipelineOutcome::Failed { stage, error }
            }
        }
    }

    fn enter(&mut self, stage: Stage) {
        info!(stage = %stage, "entering stage");
        self.state = PipelineState::Running(stage);
    }

    fn run_stages(&mut self) -> anyhow::Result<(StagingArea, ArtifactIndex, Vec<PublishReport>)> {
        self.enter(Stage::Validate);
        let registry = self.validate()?;

        let building = matches!(self.options.source, ArtifactSource::Build { .. });
        if building {
            self.enter(Stage::Prerequisites);
            self.builder.check_prerequisites()?;
        }

        let changelog = if registry.is_empty() {
            String::new()
        } else {
            self.enter(Stage::Changelog);
            load_changelog(self.config)?
        };

        self.enter(Stage::Build);
        let matrix = EffectiveMatrix::from_config(self.config);
        let (staging, index) = match &self.options.source {
            ArtifactSource::Build { keep } => {
                let staging = StagingArea::create(keep.as_deref())?;
                info!(staging = %staging.path().display(), "staging artifacts");
                let index = self.builder.build_all(&matrix, staging.path())?;
                (staging, index)
            }
            ArtifactSource::Staged(dir) => {
                let index = ArtifactIndex::scan(dir, &matrix, &self.config.build.exclude)?;
                (StagingArea::Kept(dir.clone()), index)
            }
        };

        let mut reports = Vec::with_capacity(registry.len());
        if !registry.is_empty() {
            let runtime = tokio::runtime::Runtime::new()?;
            let ctx = PublishContext {
                config: self.config,
                matrix: &matrix,
                index: &index,
                changelog: &changelog,
                dry_run: self.options.dry_run,
            };

            for publisher in registry.publishers() {
                self.enter(Stage::Publish(publisher.platform()));
                let report = runtime.block_on(publisher.publish(&ctx))?;
                info!(publisher = publisher.name(), uploads = report.uploads.len(), "platform done");
                reports.push(report);
            }
        }

        Ok((staging, index, reports))
    }

    fn validate(&mut self) -> anyhow::Result<PublisherRegistry> {
        validate_config(self.config)?;

        if !self.options.publish {
            return Ok(PublisherRegistry::new());
        }

        let mut scoped = self.config.clone();
        scoped.modrinth.enabled &= !self.options.skip_modrinth;
        scoped.curseforge.enabled &= !self.options.skip_curseforge;
        validate_credentials(&scoped, &self.credentials)?;

        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => PublisherRegistry::from_config(
                self.config,
                &self.credentials,
                self.options.skip_modrinth,
                self.options.skip_curseforge,
            )?,
        };

        if registry.is_empty() {
            warn!("no publishing platform enabled, building only");
        }

        Ok(registry)
    }
}
