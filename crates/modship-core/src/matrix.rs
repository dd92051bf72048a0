//! Effective build matrix
//!
//! The cross-product of releases and build targets, filtered by each target's
//! version allow-list. The build phase and every publisher walk the same
//! matrix so a combination skipped in one phase is skipped in all of them.

use crate::artifacts::ArtifactKey;
use crate::config::Config;
use crate::types::{BuildTarget, Release};

/// One (release, target) combination
#[derive(Debug, Clone, Copy)]
pub struct MatrixCell<'a> {
    /// Release branch
    pub release: &'a Release,
    /// Build target
    pub target: &'a BuildTarget,
}

impl<'a> MatrixCell<'a> {
    /// Key used to look the cell's artifact up in an index
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.release.version, &self.target.folder)
    }
}

/// A release and the targets built from its branch
#[derive(Debug, Clone)]
pub struct ReleaseGroup<'a> {
    /// Release branch
    pub release: &'a Release,
    /// Applicable targets, in configured order
    pub targets: Vec<&'a BuildTarget>,
}

/// Releases x targets, in configured order
#[derive(Debug, Clone)]
pub struct EffectiveMatrix<'a> {
    groups: Vec<ReleaseGroup<'a>>,
}

impl<'a> EffectiveMatrix<'a> {
    /// Compute the matrix
    pub fn new(releases: &'a [Release], targets: &'a [BuildTarget]) -> Self {
        let groups = releases
            .iter()
            .map(|release| ReleaseGroup {
                release,
                targets: targets.iter().filter(|t| t.applies_to(release)).collect(),
            })
            .collect();
        Self { groups }
    }

    /// Compute the matrix for a configuration
    pub fn from_config(config: &'a Config) -> Self {
        Self::new(&config.releases, &config.targets)
    }

    /// Every release with its applicable targets, including releases with none
    pub fn groups(&self) -> &[ReleaseGroup<'a>] {
        &self.groups
    }

    /// Iterate cells release by release
    pub fn cells(&self) -> impl Iterator<Item = MatrixCell<'a>> + '_ {
        self.groups.iter().flat_map(|group| {
            group.targets.iter().map(move |&target| MatrixCell {
                release: group.release,
                target,
            })
        })
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.targets.len()).sum()
    }

    /// Whether no combination applies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<BuildTarget> {
        vec![
            BuildTarget::new("fabric", vec!["fabric".to_string(), "quilt".to_string()]),
            BuildTarget::new("forge", vec!["forge".to_string()])
                .with_versions(vec!["1.19.2".to_string()]),
        ]
    }

    fn releases() -> Vec<Release> {
        vec![Release::new("1.19.x", "1.19.2"), Release::new("main", "1.20.4")]
    }

    #[test]
    fn test_matrix_order_and_filtering() {
        let targets = targets();
        let releases = releases();
        let matrix = EffectiveMatrix::new(&releases, &targets);

        let cells: Vec<_> = matrix
            .cells()
            .map(|c| (c.release.version.as_str(), c.target.folder.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![("1.19.2", "fabric"), ("1.19.2", "forge"), ("1.20.4", "fabric")]
        );
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_release_without_targets_is_kept_as_group() {
        let targets = vec![BuildTarget::new("forge", vec!["forge".to_string()])
            .with_versions(vec!["1.19.2".to_string()])];
        let releases = releases();
        let matrix = EffectiveMatrix::new(&releases, &targets);

        assert_eq!(matrix.groups().len(), 2);
        assert!(matrix.groups()[1].targets.is_empty());
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_matrix_is_recomputed_identically() {
        let targets = targets();
        let releases = releases();
        let first: Vec<_> = EffectiveMatrix::new(&releases, &targets)
            .cells()
            .map(|c| c.key())
            .collect();
        let second: Vec<_> = EffectiveMatrix::new(&releases, &targets)
            .cells()
            .map(|c| c.key())
            .collect();
        assert_eq!(first, second);
    }
}
