//! Host-independent path rendering.
//!
//! Paths that end up in the fingerprint manifest or in sort keys are always
//! rendered with forward slashes, whatever the host separator is, so a
//! manifest written on Windows matches discovery on the same tree later.

use std::path::Path;

/// Renders `path` with `/` separators and without `./` segments.
pub fn normalize_path(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let joined = raw
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if raw.starts_with('/') {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Joins a module name onto a base path, treating `"."` as the base itself.
pub fn join_module(base: &Path, module: &str) -> std::path::PathBuf {
    if module == "." || module.is_empty() {
        base.to_path_buf()
    } else {
        base.join(module)
    }
}
