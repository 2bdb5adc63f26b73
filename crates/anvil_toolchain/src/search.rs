//! `PATH` lookup for tool executables.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Returns `true` if `path` is an existing regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Finds `program` on the `PATH` environment variable.
///
/// A name containing a path separator is checked as given. On Windows the
/// `.exe` extension is appended when searching.
pub fn which(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    which_in(program, &path_var)
}

/// Like [`which`], searching the given `PATH`-style list instead of the environment.
pub fn which_in(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let file_name = if cfg!(windows) && candidate.extension().is_none() {
        format!("{program}.exe")
    } else {
        program.to_string()
    };
    let found = std::env::split_paths(path_var)
        .map(|dir| dir.join(&file_name))
        .find(|p| is_executable(p));
    tracing::debug!(program, found = ?found, "PATH lookup");
    found
}
