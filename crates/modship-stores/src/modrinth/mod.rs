//! Modrinth integration
//!
//! Creates one version per matrix cell through `POST /v2/version`. The request is
//! multipart: a `data` part with the JSON metadata and one part holding the jar,
//! named after the file.
//!
//! ## Authentication
//!
//! A personal access token sent in the `Authorization` header.

pub mod schema;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, instrument};

use modship_core::config::ModrinthConfig;
use modship_core::{Config, MatrixCell, StagedArtifact};

use crate::error::{Result, StoreError};
use crate::traits::Publisher;
use crate::types::{Platform, PublishContext, PublishReport, UploadRecord};

pub use schema::{CreateVersion, VersionDependency};

/// Modrinth publisher
pub struct ModrinthPublisher {
    config: ModrinthConfig,
    token: String,
    user_agent: String,
    client: Client,
}

impl ModrinthPublisher {
    /// Create a publisher
    pub fn new(config: ModrinthConfig, token: impl Into<String>, user_agent: impl Into<String>) -> Self {
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

    /// Metadata for one cell
    pub fn payload(
        &self,
        config: &Config,
        changelog: &str,
        cell: &MatrixCell<'_>,
        artifact: &StagedArtifact,
    ) -> CreateVersion {
        CreateVersion {
            name: config.display_name(cell.release, cell.target),
            version_number: config.project.version.clone(),
            changelog: changelog.to_string(),
            dependencies: cell.target.dependencies.iter().map(schema::dependency).collect(),
            game_versions: vec![cell.release.version.clone()],
            version_type: config.project.channel,
            loaders: cell.target.loaders.clone(),
            featured: self.config.featured,
            status: "listed".to_string(),
            requested_status: "listed".to_string(),
            project_id: self.config.project_id.clone(),
            file_parts: vec![artifact.file_name.clone()],
            primary_file: artifact.file_name.clone(),
        }
    }

    #[instrument(skip(self, payload, artifact), fields(file = %artifact.file_name))]
    async fn upload(&self, payload: &CreateVersion, artifact: &StagedArtifact) -> Result<Option<String>> {
        let data = serde_json::to_string(payload)?;
        let content = tokio::fs::read(&artifact.path).await?;

        let form = Form::new().text("data", data).part(
            artifact.file_name.clone(),
            Part::bytes(content)
                .file_name(artifact.file_name.clone())
                .mime_str("application/java-archive")?,
        );

        let url = format!("{}/v2/version", self.config.api_url.trim_end_matches('/'));
        info!(url = %url, "uploading to Modrinth");

        let response = self
            .client
            .post(&url)
            .header("User-Agent", &self.user_agent)
            .header("Authorization", &self.token)
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

        let version_id = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string));
        debug!(version_id = ?version_id, "Modrinth accepted upload");
        Ok(version_id)
    }
}

#[async_trait::async_trait]
impl Publisher for ModrinthPublisher {
    fn name(&self) -> &str {
        "Modrinth"
    }

    fn platform(&self) -> Platform {
        Platform::Modrinth
    }

    #[instrument(skip(self, ctx), fields(cells = ctx.matrix.len(), dry_run = ctx.dry_run))]
    async fn publish(&self, ctx: &PublishContext<'_>) -> Result<PublishReport> {
        if self.token.is_empty() {
            return Err(StoreError::AuthenticationFailed(
                "No Modrinth token configured".to_string(),
            ));
        }

        // Resolve every artifact before the first request
        let mut planned = Vec::with_capacity(ctx.matrix.len());
        for cell in ctx.matrix.cells() {
            let artifact = ctx.index.get(&cell.key())?;
            planned.push((cell, artifact, self.payload(ctx.config, ctx.changelog, &cell, artifact)));
        }

        let mut report = PublishReport::new(Platform::Modrinth);
        for (cell, artifact, payload) in planned {
            info!(
                target = %cell.target.folder,
                version = %cell.release.version,
                file = %artifact.file_name,
                "publishing to Modrinth"
            );

            let remote_id = if ctx.dry_run {
                info!(payload = %serde_json::to_string(&payload)?, "dry run - skipping upload");
                None
            } else {
                self.upload(&payload, artifact).await?
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

#[cfg(test)]
mod tests {
    use super::*;
    use modship_core::{
        ArtifactIndex, BuildTarget, Dependency, EffectiveMatrix, RelationKind, Release,
    };
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> Config {
        let mut config = Config::default();
        config.project.version = "3.0.10".to_string();
        config.project.file_name_format = "mymod-{mod_version}-{mc_version}-{loader}.jar".to_string();
        config.modrinth.enabled = true;
        config.modrinth.project_id = "XJ9is6vj".to_string();
        config.targets = vec![BuildTarget::new("fabric", vec!["fabric".to_string()])
            .with_dependency(Dependency::new("P7dR8mSH", "fabric-api", RelationKind::Required))];
        config.releases = vec![Release::new("main", "1.20.4")];
        config
    }

    fn stage(config: &Config, dir: &TempDir) -> ArtifactIndex {
        let matrix = EffectiveMatrix::from_config(config);
        let mut index = ArtifactIndex::new();
        for cell in matrix.cells() {
            let path = dir.path().join(config.file_name(cell.release, cell.target));
            std::fs::write(&path, b"jar-bytes").unwrap();
            index
                .insert(cell.key(), StagedArtifact::from_path(path).unwrap())
                .unwrap();
        }
        index
    }

    fn publisher(config: &Config, server: &MockServer) -> ModrinthPublisher {
        ModrinthPublisher::new(config.modrinth.clone(), "mr-token", "modship-test")
            .with_base_url(server.uri())
    }

    #[test]
    fn test_payload_fields() {
        let config = config();
        let staging = TempDir::new().unwrap();
        let index = stage(&config, &staging);
        let matrix = EffectiveMatrix::from_config(&config);
        let cell = matrix.cells().next().unwrap();
        let artifact = index.get(&cell.key()).unwrap();
        let publisher = ModrinthPublisher::new(config.modrinth.clone(), "t", "ua");

        let json = serde_json::to_value(publisher.payload(&config, "notes", &cell, artifact)).unwrap();
        assert_eq!(json["name"], "3.0.10 [FABRIC 1.20.4]");
        assert_eq!(json["version_number"], "3.0.10");
        assert_eq!(json["game_versions"], serde_json::json!(["1.20.4"]));
        assert_eq!(json["loaders"], serde_json::json!(["fabric"]));
        assert_eq!(json["version_type"], "release");
        assert_eq!(json["status"], "listed");
        assert_eq!(json["requested_status"], "listed");
        assert_eq!(json["featured"], false);
        assert_eq!(json["primary_file"], "mymod-3.0.10-1.20.4-fabric.jar");
        assert_eq!(json["dependencies"][0]["dependency_type"], "required");
    }

    #[test]
    fn test_payload_is_deterministic() {
        let config = config();
        let staging = TempDir::new().unwrap();
        let index = stage(&config, &staging);
        let matrix = EffectiveMatrix::from_config(&config);
        let cell = matrix.cells().next().unwrap();
        let artifact = index.get(&cell.key()).unwrap();
        let publisher = ModrinthPublisher::new(config.modrinth.clone(), "t", "ua");

        let first = serde_json::to_string(&publisher.payload(&config, "notes", &cell, artifact)).unwrap();
        let second = serde_json::to_string(&publisher.payload(&config, "notes", &cell, artifact)).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_publish_uploads_each_cell() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/version"))
            .and(header("Authorization", "mr-token"))
            .and(header("User-Agent", "modship-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"IIJJKKLL"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let config = config();
        let staging = TempDir::new().unwrap();
        let index = stage(&config, &staging);
        let matrix = EffectiveMatrix::from_config(&config);
        let ctx = PublishContext {
            config: &config,
            matrix: &matrix,
            index: &index,
            changelog: "notes",
            dry_run: false,
        };

        let report = publisher(&config, &server).publish(&ctx).await.unwrap();
        assert_eq!(report.uploads.len(), 1);
        assert_eq!(report.uploads[0].remote_id.as_deref(), Some("IIJJKKLL"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"data\""));
        assert!(body.contains("name=\"mymod-3.0.10-1.20.4-fabric.jar\""));
        assert!(body.contains("\"game_versions\":[\"1.20.4\"]"));
        assert!(body.contains("jar-bytes"));
    }

    #[tokio::test]
    async fn test_error_response_stops_publishing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/version"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid loader"))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config();
        config.releases.push(Release::new("1.19.x", "1.19.2"));
        let staging = TempDir::new().unwrap();
        let index = stage(&config, &staging);
        let matrix = EffectiveMatrix::from_config(&config);
        let ctx = PublishContext {
            config: &config,
            matrix: &matrix,
            index: &index,
            changelog: "notes",
            dry_run: false,
        };

        match publisher(&config, &server).publish(&ctx).await {
            Err(StoreError::ApiError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid loader");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_artifact_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = config();
        let matrix = EffectiveMatrix::from_config(&config);
        let index = ArtifactIndex::new();
        let ctx = PublishContext {
            config: &config,
            matrix: &matrix,
            index: &index,
            changelog: "notes",
            dry_run: false,
        };

        let result = publisher(&config, &server).publish(&ctx).await;
        assert!(matches!(result, Err(StoreError::Artifact(_))));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = config();
        let staging = TempDir::new().unwrap();
        let index = stage(&config, &staging);
        let matrix = EffectiveMatrix::from_config(&config);
        let ctx = PublishContext {
            config: &config,
            matrix: &matrix,
            index: &index,
            changelog: "notes",
            dry_run: true,
        };

        let report = publisher(&config, &server).publish(&ctx).await.unwrap();
        assert!(report.uploads[0].dry_run);
        assert!(report.uploads[0].remote_id.is_none());
    }
}
