//! CurseForge integration
//!
//! Uploads go through the legacy upload API:
//!
//! 1. `GET /api/game/version-types` and `GET /api/game/versions` to map the release
//!    and loader tags to numeric IDs
//! 2. `POST /api/projects/{id}/upload-file` with a `metadata` JSON part and a `file` part
//!
//! ## Authentication
//!
//! An API token, passed as the `token` query parameter for lookups and in the
//! `X-Api-Token` header for uploads.

pub mod catalog;
pub mod schema;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, instrument};

use modship_core::config::CurseForgeConfig;
use modship_core::{Config, MatrixCell, StagedArtifact};

use crate::error::{Result, StoreError};
use crate::traits::Publisher;
use crate::types::{Platform, PublishContext, PublishReport, UploadRecord};

pub use catalog::{GameVersion, GameVersionType, VersionCatalog};
pub use schema::{ProjectRelation, Relations, UploadMetadata};

/// CurseForge publisher
pub struct CurseForgePublisher {
    config: CurseForgeConfig,
    token: String,
    user_agent: String,
    client: Client,
}

impl CurseForgePublisher {
    /// Create a publisher
    pub fn new(config: CurseForgeConfig, token: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            config,
            token: token.into(),
            user_agent: user_agent.into(),
            client: Client::new(),
        }
    }

    /// Point the publisher at another API host
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    /// Metadata for one cell
    pub fn metadata(
        &self,
        config: &Config,
        changelog: &str,
        cell: &MatrixCell<'_>,
        catalog: &VersionCatalog,
    ) -> Result<UploadMetadata> {
        Ok(UploadMetadata {
            changelog: changelog.to_string(),
            changelog_type: "markdown".to_string(),
            display_name: config.display_name(cell.release, cell.target),
            game_versions: catalog.resolve(cell.release, cell.target)?,
            release_type: config.project.channel,
            relations: Relations {
                projects: cell.target.dependencies.iter().map(schema::relation).collect(),
            },
        })
    }

    #[instrument(skip(self, metadata, artifact), fields(file = %artifact.file_name))]
    async fn upload(&self, metadata: &UploadMetadata, artifact: &StagedArtifact) -> Result<Option<String>> {
        let metadata = serde_json::to_string(metadata)?;
        let content = tokio::fs::read(&artifact.path).await?;

        let form = Form::new().text("metadata", metadata).part(
            "file",
            Part::bytes(content)
                .file_name(artifact.file_name.clone())
                .mime_str("application/java-archive")?,
        );

        let url = format!(
            "{}/api/projects/{}/upload-file",
            self.base_url(),
            self.config.project_id
        );
        info!(url = %url, "uploading to CurseForge");

        let response = self
            .client
            .post(&url)
            .header("User-Agent", &self.user_agent)
            .header("X-Api-Token", &self.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let file_id = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("id").map(|id| id.to_string()));
        debug!(file_id = ?file_id, "CurseForge accepted upload");
        Ok(file_id)
    }
}

#[async_trait::async_trait]
impl Publisher for CurseForgePublisher {
    fn name(&self) -> &str {
        "CurseForge"
    }

    fn platform(&self) -> Platform {
        Platform::CurseForge
    }

    #[instrument(skip(self, ctx), fields(cells = ctx.matrix.len(), dry_run = ctx.dry_run))]
    async fn publish(&self, ctx: &PublishContext<'_>) -> Result<PublishReport> {
        if self.token.is_empty() {
            return Err(StoreError::AuthenticationFailed(
                "No CurseForge token configured".to_string(),
            ));
        }

        let catalog =
            VersionCatalog::fetch(&self.client, self.base_url(), &self.token, &self.user_agent).await?;

        // Resolve every cell before the first upload
        let mut planned = Vec::with_capacity(ctx.matrix.len());
        for cell in ctx.matrix.cells() {
            let metadata = self.metadata(ctx.config, ctx.changelog, &cell, &catalog)?;
            let artifact = ctx.index.get(&cell.key())?;
            planned.push((cell, artifact, metadata));
        }

        let mut report = PublishReport::new(Platform::CurseForge);
        for (cell, artifact, metadata) in planned {
            info!(
                target = %cell.target.folder,
                version = %cell.release.version,
                file = %artifact.file_name,
                game_versions = ?metadata.game_versions,
                "publishing to CurseForge"
            );

            let remote_id = if ctx.dry_run {
                info!(metadata = %serde_json::to_string(&metadata)?, "dry run - skipping upload");
                None
            } else {
                self.upload(&metadata, artifact).await?
            };

            report.uploads.push(UploadRecord {
                key: cell.key(),
                file_name: artifact.file_name.clone(),
                remote_id,
                dry_run: ctx.dry_run,
                uploaded_at: chrono::Utc::now(),
            });
        }

        Ok(report)
    }
}
