//! Descriptor types shared by the build and publish phases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Relationship between a mod and one of its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Must be installed alongside the mod
    Required,
    /// Enhances the mod when present
    Optional,
    /// Cannot be installed together with the mod
    Incompatible,
    /// Shipped inside the mod's jar
    Embedded,
}

impl RelationKind {
    /// Lowercase name as written in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Required => "required",
            RelationKind::Optional => "optional",
            RelationKind::Incompatible => "incompatible",
            RelationKind::Embedded => "embedded",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency on another project, identified on both platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Modrinth project ID
    pub modrinth_id: String,

    /// CurseForge project slug
    pub curseforge_slug: String,

    /// Relation kind
    pub kind: RelationKind,
}

impl Dependency {
    /// Create a new dependency
    pub fn new(
        modrinth_id: impl Into<String>,
        curseforge_slug: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        Self {
            modrinth_id: modrinth_id.into(),
            curseforge_slug: curseforge_slug.into(),
            kind,
        }
    }
}

/// One build variant, usually one mod loader ecosystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Subproject folder holding this target's build output
    pub folder: String,

    /// Loader tags this build is compatible with (e.g. `fabric`, `quilt`)
    pub loaders: Vec<String>,

    /// Dependencies declared on every upload of this target
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Versions this target is built for; `None` means all releases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
}

impl BuildTarget {
    /// Create a target with the given folder and loader tags
    pub fn new(folder: impl Into<String>, loaders: Vec<String>) -> Self {
        Self {
            folder: folder.into(),
            loaders,
            dependencies: Vec::new(),
            versions: None,
        }
    }

    /// Add a dependency
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Restrict the target to the given versions
    pub fn with_versions(mut self, versions: Vec<String>) -> Self {
        self.versions = Some(versions);
        self
    }

    /// Whether this target is built and published for the given release
    pub fn applies_to(&self, release: &Release) -> bool {
        match &self.versions {
            Some(versions) => versions.iter().any(|v| v == &release.version),
            None => true,
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.folder, self.loaders.join(", "))
    }
}

/// One release branch mapped to a game version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Git branch to check out
    pub branch: String,

    /// Game version this branch is published under (e.g. `1.20.4`)
    pub version: String,

    /// Toolchain home used for this branch's build (e.g. a specific JDK)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<PathBuf>,
}

impl Release {
    /// Create a release
    pub fn new(branch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            version: version.into(),
            toolchain: None,
        }
    }

    /// Set a toolchain override
    pub fn with_toolchain(mut self, toolchain: impl Into<PathBuf>) -> Self {
        self.toolchain = Some(toolchain.into());
        self
    }

    /// `major.minor` part of the version (`1.20.4` -> `1.20`)
    pub fn major_minor(&self) -> Option<String> {
        let mut parts = self.version.split('.');
        let major = parts.next().filter(|p| !p.is_empty())?;
        let minor = parts.next().filter(|p| !p.is_empty())?;
        Some(format!("{}.{}", major, minor))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch {} for {}", self.branch, self.version)
    }
}

/// Release channel on both platforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    /// Stable release
    #[default]
    Release,
    /// Beta
    Beta,
    /// Alpha
    Alpha,
}

impl ReleaseChannel {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Release => "release",
            ReleaseChannel::Beta => "beta",
            ReleaseChannel::Alpha => "alpha",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_without_allow_list_applies_everywhere() {
        let target = BuildTarget::new("fabric", vec!["fabric".to_string()]);
        assert!(target.applies_to(&Release::new("main", "1.20.4")));
        assert!(target.applies_to(&Release::new("1.19.x", "1.19.2")));
    }

    #[test]
    fn test_target_allow_list() {
        let target = BuildTarget::new("forge", vec!["forge".to_string()])
            .with_versions(vec!["1.19.2".to_string()]);
        assert!(target.applies_to(&Release::new("1.19.x", "1.19.2")));
        assert!(!target.applies_to(&Release::new("main", "1.20.4")));
    }

    #[test]
    fn test_major_minor() {
        assert_eq!(Release::new("main", "1.20.4").major_minor().as_deref(), Some("1.20"));
        assert_eq!(Release::new("main", "1.21").major_minor().as_deref(), Some("1.21"));
        assert_eq!(Release::new("main", "1").major_minor(), None);
    }

    #[test]
    fn test_relation_kind_rejects_unknown() {
        let parsed: Result<RelationKind, _> = serde_json::from_str("\"recommended\"");
        assert!(parsed.is_err());
        let parsed: RelationKind = serde_json::from_str("\"embedded\"").unwrap();
        assert_eq!(parsed, RelationKind::Embedded);
    }

    #[test]
    fn test_release_channel_parse() {
        let channel: ReleaseChannel = serde_json::from_str("\"beta\"").unwrap();
        assert_eq!(channel, ReleaseChannel::Beta);
        assert!(serde_json::from_str::<ReleaseChannel>("\"snapshot\"").is_err());
    }
}
