//! Persistent per-file fingerprints for incremental builds.
//!
//! This crate stores one [`FingerprintRecord`] per compiled source file in a
//! plain-text [`FingerprintManifest`]. A file whose current content
//! fingerprint matches its record (and whose object still exists) does not
//! need recompiling. The manifest is rewritten in full and atomically at the
//! end of each compile phase.

#![warn(missing_docs)]

pub mod error;
pub mod hasher;
pub mod manifest;
pub mod record;

pub use error::CacheError;
pub use hasher::SourceHasher;
pub use manifest::FingerprintManifest;
pub use record::{FingerprintRecord, RecordError};
