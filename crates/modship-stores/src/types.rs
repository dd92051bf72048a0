//! Common types for publishers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use modship_core::{ArtifactIndex, ArtifactKey, Config, EffectiveMatrix};

/// Distribution platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// modrinth.com
    Modrinth,
    /// curseforge.com
    CurseForge,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Modrinth => write!(f, "Modrinth"),
            Platform::CurseForge => write!(f, "CurseForge"),
        }
    }
}

/// Everything a publisher reads during one publish phase
#[derive(Debug, Clone, Copy)]
pub struct PublishContext<'a> {
    /// Project configuration
    pub config: &'a Config,

    /// Combinations to upload
    pub matrix: &'a EffectiveMatrix<'a>,

    /// Staged artifacts produced by the build
    pub index: &'a ArtifactIndex,

    /// Changelog text sent with every upload
    pub changelog: &'a str,

    /// Resolve and log everything but skip the upload requests
    pub dry_run: bool,
}

/// One uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Matrix cell
    pub key: ArtifactKey,

    /// Uploaded file name
    pub file_name: String,

    /// ID assigned by the platform
    pub remote_id: Option<String>,

    /// Whether the request was skipped
    pub dry_run: bool,

    /// Completion time
    pub uploaded_at: DateTime<Utc>,
}

/// Result of a publish phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReport {
    /// Platform
    pub platform: Platform,

    /// Uploads in matrix order
    pub uploads: Vec<UploadRecord>,
}

impl PublishReport {
    /// Create an empty report
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            uploads: Vec::new(),
        }
    }
}
