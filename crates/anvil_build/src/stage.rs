//! Moving transient tool outputs to their canonical locations.
//!
//! Staging creates the destination directory, copies the transient file into
//! it, and removes the transient file. The copy goes through a temporary file
//! in the destination directory that is renamed into place, so the canonical
//! artifact is either the previous version or the complete new one.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::compile::TransientObject;
use crate::error::BuildError;
use crate::layout::BuildLayout;

/// Stages `transient` as `dest_dir/dest_name` and returns the canonical path.
pub fn stage_file(transient: &Path, dest_dir: &Path, dest_name: &str) -> Result<PathBuf, BuildError> {
    std::fs::create_dir_all(dest_dir).map_err(|source| BuildError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let dest = dest_dir.join(dest_name);
    copy_atomically(transient, dest_dir, &dest).map_err(|source| BuildError::StageCopy {
        from: transient.to_path_buf(),
        to: dest.clone(),
        source,
    })?;

    std::fs::remove_file(transient).map_err(|source| BuildError::Cleanup {
        path: transient.to_path_buf(),
        source,
    })?;
    tracing::debug!(from = %transient.display(), to = %dest.display(), "staged");
    Ok(dest)
}

fn copy_atomically(from: &Path, dir: &Path, dest: &Path) -> io::Result<()> {
    let mut input = File::open(from)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut input, tmp.as_file_mut())?;
    let permissions = input.metadata()?.permissions();
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Stages a compiled object into `object/<platform>/<module>/`.
pub fn stage_object(
    object: &TransientObject,
    layout: &BuildLayout,
    module: &str,
) -> Result<PathBuf, BuildError> {
    stage_file(&object.path, &layout.object_dir(module), &object.canonical_name)
}
