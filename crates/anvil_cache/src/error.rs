//! Error types for fingerprint store operations.

use std::path::PathBuf;

/// Errors that can occur while reading sources or persisting the manifest.
///
/// Corrupt manifest lines are not errors: they are discarded on load and
/// counted in [`FingerprintManifest::discarded`](crate::FingerprintManifest::discarded).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a file.
    #[error("fingerprint I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CacheError {
    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            CacheError::Io { path, .. } => path,
        }
    }
}
