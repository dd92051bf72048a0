//! Staged artifacts and the index linking build output to uploads
//!
//! File names are matched token-wise: a file stem is split on every character
//! that is not an ASCII alphanumeric or `.`, and an identifier matches only when
//! its own tokens appear as a contiguous run. `forge` does not match
//! `mymod-1.20.4-neoforge.jar` and `1.20` does not match `mymod-1.20.4-forge.jar`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ArtifactError;
use crate::matrix::EffectiveMatrix;

/// Identifies one staged artifact: (version identifier, target folder)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    /// Release version identifier
    pub version: String,
    /// Build target folder
    pub target: String,
}

impl ArtifactKey {
    /// Create a key
    pub fn new(version: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.version)
    }
}

/// A jar sitting in the staging directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedArtifact {
    /// Absolute path in the staging directory
    pub path: PathBuf,

    /// File name, also used as the upload part name
    pub file_name: String,

    /// Size in bytes
    pub size: u64,

    /// SHA256 hash (hex encoded)
    pub sha256: String,
}

impl StagedArtifact {
    /// Describe a staged file, hashing its contents
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let path = path.into();
        let content = std::fs::read(&path).map_err(|source| ArtifactError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            size: content.len() as u64,
            sha256: format!("{:x}", Sha256::digest(&content)),
            file_name,
            path,
        })
    }
}

/// Mapping from (version, target) to staged artifact
#[derive(Debug, Clone, Default)]
pub struct ArtifactIndex {
    entries: BTreeMap<ArtifactKey, StagedArtifact>,
}

impl ArtifactIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an artifact; a second artifact for the same key is an error
    pub fn insert(&mut self, key: ArtifactKey, artifact: StagedArtifact) -> Result<(), ArtifactError> {
        if let Some(existing) = self.entries.get(&key) {
            return Err(ArtifactError::Ambiguous {
                target: key.target,
                version: key.version,
                candidates: vec![existing.file_name.clone(), artifact.file_name],
            });
        }
        debug!(key = %key, file = %artifact.file_name, "indexed artifact");
        self.entries.insert(key, artifact);
        Ok(())
    }

    /// Look up an artifact
    pub fn get(&self, key: &ArtifactKey) -> Result<&StagedArtifact, ArtifactError> {
        self.entries
            .get(key)
            .ok_or_else(|| ArtifactError::NotIndexed {
                target: key.target.clone(),
                version: key.version.clone(),
            })
    }

    /// Number of indexed artifacts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &StagedArtifact)> {
        self.entries.iter()
    }

    /// Rebuild an index from a staging directory populated by an earlier build
    ///
    /// Every matrix cell must match exactly one non-excluded file.
    pub fn scan(
        dir: &Path,
        matrix: &EffectiveMatrix<'_>,
        exclude: &[String],
    ) -> Result<Self, ArtifactError> {
        info!(dir = %dir.display(), cells = matrix.len(), "scanning staging directory");
        let files = list_files(dir)?;
        let mut index = Self::new();

        for cell in matrix.cells() {
            let candidates: Vec<&String> = files
                .iter()
                .filter(|f| !is_excluded(f, exclude))
                .filter(|f| matches_artifact(f, &cell.release.version, &cell.target.folder))
                .collect();

            let file_name = match candidates.as_slice() {
                [] => {
                    return Err(ArtifactError::Missing {
                        target: cell.target.folder.clone(),
                        version: cell.release.version.clone(),
                        dir: dir.to_path_buf(),
                        found: files.clone(),
                    })
                }
                [single] => single.as_str(),
                many => {
                    return Err(ArtifactError::Ambiguous {
                        target: cell.target.folder.clone(),
                        version: cell.release.version.clone(),
                        candidates: many.iter().map(|s| s.to_string()).collect(),
                    })
                }
            };

            index.insert(cell.key(), StagedArtifact::from_path(dir.join(file_name))?)?;
        }

        Ok(index)
    }
}

/// Sorted names of regular files in a directory
pub fn list_files(dir: &Path) -> Result<Vec<String>, ArtifactError> {
    let read_failed = |source| ArtifactError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        if entry.file_type().map_err(read_failed)?.is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Whether a file is a development or sources jar
pub fn is_excluded(file_name: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|p| !p.is_empty() && file_name.contains(p.as_str()))
}

/// Whether a staged file name belongs to the given version and target folder
pub fn matches_artifact(file_name: &str, version: &str, folder: &str) -> bool {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    contains_token_run(&stem, version) && contains_token_run(&stem, folder)
}

/// Whether the tokens of `needle` appear contiguously in the tokens of `haystack`
pub fn contains_token_run(haystack: &str, needle: &str) -> bool {
    let haystack = tokens(haystack);
    let needle = tokens(needle);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Characters that split a file stem into tokens
pub fn is_token_separator(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '.')
}

fn tokens(s: &str) -> Vec<&str> {
    s.split(is_token_separator)
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildTarget, Release};
    use tempfile::TempDir;

    fn exclude() -> Vec<String> {
        vec!["dev-shadow".to_string(), "sources".to_string()]
    }

    #[test]
    fn test_sources_jar_is_excluded() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("mymod-3.0.10-1.20.4-forge.jar"), b"jar").unwrap();
        std::fs::write(temp.path().join("mymod-3.0.10-1.20.4-forge-sources.jar"), b"src").unwrap();

        let releases = vec![Release::new("main", "1.20.4")];
        let targets = vec![BuildTarget::new("forge", vec!["forge".to_string()])];
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let index = ArtifactIndex::scan(temp.path(), &matrix, &exclude()).unwrap();
        let artifact = index.get(&ArtifactKey::new("1.20.4", "forge")).unwrap();
        assert_eq!(artifact.file_name, "mymod-3.0.10-1.20.4-forge.jar");
        assert_eq!(artifact.size, 3);
    }

    #[test]
    fn test_forge_does_not_match_neoforge() {
        assert!(!matches_artifact("mymod-3.0.10-1.20.4-neoforge.jar", "1.20.4", "forge"));
        assert!(matches_artifact("mymod-3.0.10-1.20.4-neoforge.jar", "1.20.4", "neoforge"));
        assert!(matches_artifact("mymod-3.0.10-1.20.4-forge.jar", "1.20.4", "forge"));
    }

    #[test]
    fn test_scan_separates_forge_and_neoforge() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("mymod-3.0.10-1.20.4-neoforge.jar"), b"neo").unwrap();
        std::fs::write(temp.path().join("mymod-3.0.10-1.20.4-forge.jar"), b"forge").unwrap();

        let releases = vec![Release::new("main", "1.20.4")];
        let targets = vec![
            BuildTarget::new("forge", vec!["forge".to_string()]),
            BuildTarget::new("neoforge", vec!["neoforge".to_string()]),
        ];
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let index = ArtifactIndex::scan(temp.path(), &matrix, &exclude()).unwrap();
        assert_eq!(
            index.get(&ArtifactKey::new("1.20.4", "forge")).unwrap().file_name,
            "mymod-3.0.10-1.20.4-forge.jar"
        );
        assert_eq!(
            index.get(&ArtifactKey::new("1.20.4", "neoforge")).unwrap().file_name,
            "mymod-3.0.10-1.20.4-neoforge.jar"
        );
    }

    #[test]
    fn test_neoforge_alone_does_not_satisfy_forge() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("mymod-3.0.10-1.20.4-neoforge.jar"), b"neo").unwrap();

        let releases = vec![Release::new("main", "1.20.4")];
        let targets = vec![BuildTarget::new("forge", vec!["forge".to_string()])];
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let err = ArtifactIndex::scan(temp.path(), &matrix, &exclude()).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn test_version_prefix_does_not_match() {
        assert!(!matches_artifact("mymod-3.0.10-1.20.4-forge.jar", "1.20", "forge"));
        assert!(matches_artifact("mymod-3.0.10-1.20-forge.jar", "1.20", "forge"));
    }

    #[test]
    fn test_scan_reports_ambiguity() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a-1.20.4-fabric.jar"), b"a").unwrap();
        std::fs::write(temp.path().join("b-1.20.4-fabric.jar"), b"b").unwrap();

        let releases = vec![Release::new("main", "1.20.4")];
        let targets = vec![BuildTarget::new("fabric", vec!["fabric".to_string()])];
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let err = ArtifactIndex::scan(temp.path(), &matrix, &exclude()).unwrap_err();
        match err {
            ArtifactError::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_skips_targets_outside_allow_list() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("mymod-1.0-1.20.4-fabric.jar"), b"a").unwrap();

        let releases = vec![Release::new("main", "1.20.4")];
        let targets = vec![
            BuildTarget::new("fabric", vec!["fabric".to_string()]),
            BuildTarget::new("forge", vec!["forge".to_string()])
                .with_versions(vec!["1.19.2".to_string()]),
        ];
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let index = ArtifactIndex::scan(temp.path(), &matrix, &exclude()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get(&ArtifactKey::new("1.20.4", "forge")).is_err());
    }

    #[test]
    fn test_index_rejects_duplicate_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("x-1.20.4-fabric.jar");
        std::fs::write(&path, b"x").unwrap();
        let artifact = StagedArtifact::from_path(&path).unwrap();

        let mut index = ArtifactIndex::new();
        let key = ArtifactKey::new("1.20.4", "fabric");
        index.insert(key.clone(), artifact.clone()).unwrap();
        assert!(index.insert(key, artifact).is_err());
    }

    #[test]
    fn test_staged_artifact_hash() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.jar");
        std::fs::write(&path, b"").unwrap();
        let artifact = StagedArtifact::from_path(&path).unwrap();
        assert_eq!(
            artifact.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_is_excluded() {
        let patterns = exclude();
        assert!(is_excluded("mymod-1.0-dev-shadow.jar", &patterns));
        assert!(is_excluded("mymod-1.0-sources.jar", &patterns));
        assert!(!is_excluded("mymod-1.0.jar", &patterns));
    }
}
