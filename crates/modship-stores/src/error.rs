//! Store error types

use thiserror::Error;

use modship_core::ArtifactError;

/// Publishing errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No token for an enabled platform
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Non-success response; `message` is the raw response body
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// CurseForge has no version type for the release's major version
    #[error("Could not find CurseForge version type '{0}'")]
    MajorVersionNotFound(String),

    /// CurseForge has no game version entry for the release
    #[error("Could not find CurseForge game version '{version}' under '{version_type}'")]
    VersionNotFound {
        version: String,
        version_type: String,
    },

    /// CurseForge has no entry for a loader tag
    #[error("Could not find CurseForge version ID for loader '{0}'")]
    LoaderNotFound(String),

    /// The release version has no major.minor part
    #[error("Invalid game version '{0}'")]
    InvalidGameVersion(String),

    /// Staged artifact missing or unreadable
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
