//! modship core - shared types for building and shipping Minecraft mods
//!
//! This crate holds the descriptor types (releases, build targets, dependencies),
//! configuration loading and validation, the effective build matrix and the
//! artifact index that links the build phase to the publish phase.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod matrix;
pub mod types;

pub use artifacts::{ArtifactIndex, ArtifactKey, StagedArtifact};
pub use config::{Config, Credentials};
pub use error::{ArtifactError, BuildError, ConfigError, ModshipError, Result};
pub use matrix::{EffectiveMatrix, MatrixCell, ReleaseGroup};
pub use types::{BuildTarget, Dependency, RelationKind, Release, ReleaseChannel};
