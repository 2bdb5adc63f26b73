//! Removing build outputs.

use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::layout::{
    determine_build_dir, determine_manifest_path, determine_object_dir, BUILD_DIR, OBJECT_DIR,
    STATE_DIR,
};

/// Removes the objects, binary directory and manifest of one platform.
///
/// Returns the paths that existed and were removed.
pub fn clean_platform(project_dir: &Path, platform: &str) -> Result<Vec<PathBuf>, BuildError> {
    remove_all([
        determine_object_dir(project_dir, platform),
        determine_build_dir(project_dir, platform),
        determine_manifest_path(project_dir, platform),
    ])
}

/// Removes the output and state directories of every platform.
pub fn clean_all(project_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    remove_all([OBJECT_DIR, BUILD_DIR, STATE_DIR].map(|d| project_dir.join(d)))
}

fn remove_all<const N: usize>(paths: [PathBuf; N]) -> Result<Vec<PathBuf>, BuildError> {
    let mut removed = Vec::new();
    for path in paths {
        let result = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else if path.exists() {
            std::fs::remove_file(&path)
        } else {
            continue;
        };
        result.map_err(BuildError::io(&path))?;
        tracing::debug!(path = %path.display(), "removed");
        removed.push(path);
    }
    Ok(removed)
}
