//! Build orchestration for modship
//!
//! For every release branch the orchestrator checks the branch out, clears
//! stale build output, runs the build tool once and moves each target's jar
//! into the staging directory. The result is an [`ArtifactIndex`] the
//! publishers consume.
//!
//! ## Usage
//!
//! ```ignore
//! use modship_build::{ArtifactBuilder, BuildOrchestrator};
//! use modship_core::EffectiveMatrix;
//!
//! let orchestrator = BuildOrchestrator::new(&config);
//! let index = orchestrator.build_all(&EffectiveMatrix::from_config(&config), staging.path())?;
//! ```
//!
//! [`ArtifactIndex`]: modship_core::ArtifactIndex

pub mod git;
pub mod orchestrator;
pub mod output;
pub mod prerequisites;
pub mod runner;

pub use git::Git;
pub use orchestrator::{ArtifactBuilder, BuildOrchestrator};
pub use prerequisites::check_prerequisites;
pub use runner::{CommandRunner, SystemRunner, ToolCommand};
