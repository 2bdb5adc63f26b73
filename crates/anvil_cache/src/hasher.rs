//! Source file hashing.

use std::path::Path;

use anvil_common::Fingerprint;

use crate::error::CacheError;

/// Utility for fingerprinting source files.
pub struct SourceHasher;

impl SourceHasher {
    /// Computes the fingerprint of a single file.
    pub fn hash_file(path: &Path) -> Result<Fingerprint, CacheError> {
        Fingerprint::of_file(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
