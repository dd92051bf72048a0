//! Error types for modship

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ModshipError
pub type Result<T> = std::result::Result<T, ModshipError>;

/// Main error type for modship operations
#[derive(Debug, Error)]
pub enum ModshipError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Build-related errors
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Artifact resolution errors
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl ModshipError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Platform enabled without a token
    #[error("Publishing to {platform} is enabled but {variable} is not set")]
    MissingCredential {
        platform: &'static str,
        variable: &'static str,
    },

    /// Failed to read a file referenced by the configuration
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Shorthand for an invalid value error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while checking out branches and running the build tool
#[derive(Debug, Error)]
pub enum BuildError {
    /// Executable could not be located
    #[error("Required tool not found: {tool} ({reason})")]
    ToolNotFound { tool: String, reason: String },

    /// Process could not be started
    #[error("Failed to start {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a non-zero status
    #[error("Command `{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    /// Moving a build product into the staging area failed
    #[error("Failed to stage {from} as {to}: {source}")]
    StagingFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a stale output directory failed
    #[error("Failed to clear {path}: {source}")]
    CleanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors locating build products and staged artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No file matched
    #[error("No artifact for target '{target}' and version '{version}' in {dir} (found: {})", .found.join(", "))]
    Missing {
        target: String,
        version: String,
        dir: PathBuf,
        found: Vec<String>,
    },

    /// More than one file matched
    #[error("Ambiguous artifacts for target '{target}' and version '{version}': {}", .candidates.join(", "))]
    Ambiguous {
        target: String,
        version: String,
        candidates: Vec<String>,
    },

    /// The artifact was never staged
    #[error("Artifact for target '{target}' and version '{version}' is not in the index")]
    NotIndexed { target: String, version: String },

    /// Reading a directory or file failed
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
