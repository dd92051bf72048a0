//! CurseForge upload metadata

use serde::Serialize;

use modship_core::{Dependency, RelationKind, ReleaseChannel};

/// Body of the `metadata` part of an upload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub changelog: String,
    pub changelog_type: String,
    pub display_name: String,
    pub game_versions: Vec<u64>,
    pub release_type: ReleaseChannel,
    pub relations: Relations,
}

/// Project relations of an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relations {
    pub projects: Vec<ProjectRelation>,
}

/// One related project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRelation {
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// CurseForge relation type for a relation kind
///
/// `required` and `optional` become `requiredDependency` and `optionalDependency`,
/// `embedded` becomes `embeddedLibrary`. Anything else passes through.
pub fn relation_type(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Required => "requiredDependency",
        RelationKind::Optional => "optionalDependency",
        RelationKind::Embedded => "embeddedLibrary",
        RelationKind::Incompatible => "incompatible",
    }
}

/// Translate a dependency into CurseForge's schema
pub fn relation(dependency: &Dependency) -> ProjectRelation {
    ProjectRelation {
        slug: dependency.curseforge_slug.clone(),
        kind: relation_type(dependency.kind).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_mapping() {
        assert_eq!(relation_type(RelationKind::Required), "requiredDependency");
        assert_eq!(relation_type(RelationKind::Optional), "optionalDependency");
        assert_eq!(relation_type(RelationKind::Embedded), "embeddedLibrary");
        assert_eq!(relation_type(RelationKind::Incompatible), "incompatible");
    }

    #[test]
    fn test_relation_uses_slug() {
        let dep = Dependency::new("P7dR8mSH", "fabric-api", RelationKind::Required);
        let json = serde_json::to_value(relation(&dep)).unwrap();
        assert_eq!(json, serde_json::json!({"slug": "fabric-api", "type": "requiredDependency"}));
    }

    #[test]
    fn test_metadata_field_names() {
        let metadata = UploadMetadata {
            changelog: "notes".to_string(),
            changelog_type: "markdown".to_string(),
            display_name: "3.0.10 [FABRIC 1.20.4]".to_string(),
            game_versions: vec![10407, 7499],
            release_type: ReleaseChannel::Beta,
            relations: Relations { projects: vec![] },
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(
            json,
            r#"{"changelog":"notes","changelogType":"markdown","displayName":"3.0.10 [FABRIC 1.20.4]","gameVersions":[10407,7499],"releaseType":"beta","relations":{"projects":[]}}"#
        );
    }
}
