//! CurseForge game version catalog
//!
//! The upload API identifies Minecraft versions and loaders by numeric IDs. Both
//! lists are fetched once per publish phase and resolved locally.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use modship_core::{BuildTarget, Release};

use crate::error::{Result, StoreError};

/// Entry of `/api/game/version-types`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameVersionType {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Entry of `/api/game/versions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameVersion {
    pub id: u64,
    #[serde(rename = "gameVersionTypeID", default)]
    pub game_version_type_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Both lookup lists
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    pub version_types: Vec<GameVersionType>,
    pub versions: Vec<GameVersion>,
}

impl VersionCatalog {
    /// Build a catalog from already fetched lists
    pub fn new(version_types: Vec<GameVersionType>, versions: Vec<GameVersion>) -> Self {
        Self {
            version_types,
            versions,
        }
    }

    /// Fetch both lists
    #[instrument(skip(client, token, user_agent))]
    pub async fn fetch(client: &Client, api_url: &str, token: &str, user_agent: &str) -> Result<Self> {
        let base = api_url.trim_end_matches('/');
        let version_types: Vec<GameVersionType> =
            get_json(client, &format!("{}/api/game/version-types", base), token, user_agent).await?;
        let versions: Vec<GameVersion> =
            get_json(client, &format!("{}/api/game/versions", base), token, user_agent).await?;

        debug!(
            version_types = version_types.len(),
            versions = versions.len(),
            "fetched CurseForge catalog"
        );
        Ok(Self::new(version_types, versions))
    }

    /// Version type named `Minecraft <major>.<minor>` for a release
    pub fn major_version_type(&self, release: &Release) -> Result<&GameVersionType> {
        let major = release
            .major_minor()
            .ok_or_else(|| StoreError::InvalidGameVersion(release.version.clone()))?;
        let name = format!("Minecraft {}", major);

        self.version_types
            .iter()
            .find(|t| t.name == name)
            .ok_or(StoreError::MajorVersionNotFound(name))
    }

    /// Game version entry of a release inside its major version type
    pub fn game_version(&self, release: &Release) -> Result<&GameVersion> {
        let version_type = self.major_version_type(release)?;

        self.versions
            .iter()
            .find(|v| v.name == release.version && v.game_version_type_id == version_type.id)
            .ok_or_else(|| StoreError::VersionNotFound {
                version: release.version.clone(),
                version_type: version_type.name.clone(),
            })
    }

    /// Entry whose slug equals a loader tag
    pub fn loader(&self, tag: &str) -> Result<&GameVersion> {
        self.versions
            .iter()
            .find(|v| v.slug == tag)
            .ok_or_else(|| StoreError::LoaderNotFound(tag.to_string()))
    }

    /// The `gameVersions` list of an upload: the game version ID, then one ID per
    /// loader tag in tag order
    pub fn resolve(&self, release: &Release, target: &BuildTarget) -> Result<Vec<u64>> {
        let mut ids = vec![self.game_version(release)?.id];
        for tag in &target.loaders {
            ids.push(self.loader(tag)?.id);
        }
        Ok(ids)
    }
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    token: &str,
    user_agent: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .query(&[("token", token)])
        .header("User-Agent", user_agent)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}
