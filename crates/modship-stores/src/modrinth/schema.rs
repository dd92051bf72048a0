//! Modrinth request payloads

use serde::Serialize;

use modship_core::{Dependency, RelationKind, ReleaseChannel};

/// Dependency entry of a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDependency {
    /// Always null: depend on the project, not a specific version
    pub version_id: Option<String>,
    /// Modrinth project ID
    pub project_id: String,
    /// Always null
    pub file_name: Option<String>,
    /// Relation kind, passed through unchanged
    pub dependency_type: RelationKind,
}

/// Translate a dependency into Modrinth's schema
pub fn dependency(dependency: &Dependency) -> VersionDependency {
    VersionDependency {
        version_id: None,
        project_id: dependency.modrinth_id.clone(),
        file_name: None,
        dependency_type: dependency.kind,
    }
}

/// Body of the `data` part of a version creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVersion {
    pub name: String,
    pub version_number: String,
    pub changelog: String,
    pub dependencies: Vec<VersionDependency>,
    pub game_versions: Vec<String>,
    pub version_type: ReleaseChannel,
    pub loaders: Vec<String>,
    pub featured: bool,
    pub status: String,
    pub requested_status: String,
    pub project_id: String,
    pub file_parts: Vec<String>,
    pub primary_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_passes_kind_through() {
        for (kind, expected) in [
            (RelationKind::Required, "required"),
            (RelationKind::Optional, "optional"),
            (RelationKind::Incompatible, "incompatible"),
            (RelationKind::Embedded, "embedded"),
        ] {
            let dep = Dependency::new("lhGA9TYQ", "architectury-api", kind);
            let json = serde_json::to_value(dependency(&dep)).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "version_id": null,
                    "project_id": "lhGA9TYQ",
                    "file_name": null,
                    "dependency_type": expected,
                })
            );
        }
    }
}
