//! The on-disk fingerprint manifest.
//!
//! The manifest is a text file with one `<path>:<128 hex digits>` line per
//! source file. Lines that fail validation are dropped on load, so a damaged
//! manifest only costs recompilation of the affected files. The whole file is
//! rewritten on every flush through a temporary file in the same directory
//! followed by a rename, so readers never see a half-written manifest.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anvil_common::Fingerprint;

use crate::error::CacheError;
use crate::record::FingerprintRecord;

/// In-memory view of one platform's fingerprint manifest.
#[derive(Debug, Clone)]
pub struct FingerprintManifest {
    path: PathBuf,
    records: BTreeMap<String, FingerprintRecord>,
    discarded: usize,
}

impl FingerprintManifest {
    /// Creates an empty manifest that will be flushed to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
            discarded: 0,
        }
    }

    /// Loads the manifest at `path`.
    ///
    /// A missing file yields an empty manifest. Corrupt lines are discarded
    /// and counted; blank lines are skipped silently.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no fingerprint manifest, starting empty");
                return Ok(Self::new(path));
            }
            Err(e) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        let mut manifest = Self::new(path);
        manifest.merge_lines(&content);
        Ok(manifest)
    }

    fn merge_lines(&mut self, content: &[u8]) {
        for (lineno, raw) in content.split(|&b| b == b'\n').enumerate() {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line.strip_suffix('\r').unwrap_or(line),
                Err(reason) => {
                    self.discarded += 1;
                    tracing::warn!(
                        path = %self.path.display(),
                        line = lineno + 1,
                        %reason,
                        "discarding fingerprint record that is not UTF-8"
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<FingerprintRecord>() {
                Ok(record) => {
                    self.records.insert(record.source.clone(), record);
                }
                Err(reason) => {
                    self.discarded += 1;
                    tracing::warn!(
                        path = %self.path.display(),
                        line = lineno + 1,
                        %reason,
                        "discarding corrupt fingerprint record"
                    );
                }
            }
        }
    }

    /// Where this manifest is flushed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of corrupt lines dropped while loading.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Looks up the record for a normalized source path.
    pub fn get(&self, source: &str) -> Option<&FingerprintRecord> {
        self.records.get(source)
    }

    /// Returns `true` if `source` has a record equal to `fingerprint`.
    pub fn matches(&self, source: &str, fingerprint: &Fingerprint) -> bool {
        self.get(source)
            .is_some_and(|record| record.fingerprint == *fingerprint)
    }

    /// Inserts or replaces the record for its source path.
    pub fn insert(&mut self, record: FingerprintRecord) {
        self.records.insert(record.source.clone(), record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in path order.
    pub fn iter(&self) -> impl Iterator<Item = &FingerprintRecord> {
        self.records.values()
    }

    /// Writes every record to disk, replacing the previous manifest atomically.
    ///
    /// Creates the parent directory when needed.
    pub fn flush(&self) -> Result<(), CacheError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| CacheError::Io { path, source }
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
        {
            let mut out = std::io::BufWriter::new(tmp.as_file_mut());
            for record in self.records.values() {
                writeln!(out, "{record}").map_err(io_err(&self.path))?;
            }
            out.flush().map_err(io_err(&self.path))?;
        }
        tmp.as_file().sync_all().map_err(io_err(&self.path))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::Io {
                path: self.path.clone(),
                source: e.error,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            records = self.records.len(),
            "flushed fingerprint manifest"
        );
        Ok(())
    }
}
