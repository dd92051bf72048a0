//! Build output handling: clearing stale output, choosing the jar, staging it

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use modship_core::artifacts::{is_excluded, list_files};
use modship_core::{ArtifactError, ArtifactKey, BuildError};

/// Delete a previous build output directory; a missing directory is fine
pub fn clear_output_dir(dir: &Path) -> Result<(), BuildError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "cleared stale build output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::CleanFailed {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Choose the distributable jar in a target's output directory
///
/// Files matching an exclusion pattern are ignored. Exactly one file must remain.
pub fn select_build_output(
    dir: &Path,
    exclude: &[String],
    key: &ArtifactKey,
) -> Result<PathBuf, ArtifactError> {
    let files = if dir.is_dir() { list_files(dir)? } else { Vec::new() };
    let candidates: Vec<&String> = files.iter().filter(|f| !is_excluded(f, exclude)).collect();

    match candidates.as_slice() {
        [single] => Ok(dir.join(single.as_str())),
        [] => {
            warn!(dir = %dir.display(), files = ?files, "no build jar found");
            Err(ArtifactError::Missing {
                target: key.target.clone(),
                version: key.version.clone(),
                dir: dir.to_path_buf(),
                found: files.clone(),
            })
        }
        many => Err(ArtifactError::Ambiguous {
            target: key.target.clone(),
            version: key.version.clone(),
            candidates: many.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// Move a file, falling back to copy and delete across filesystems
pub fn move_file(from: &Path, to: &Path) -> Result<(), BuildError> {
    let staging_failed = |source| BuildError::StagingFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    std::fs::copy(from, to).map_err(staging_failed)?;
    std::fs::remove_file(from).map_err(staging_failed)?;
    Ok(())
}
