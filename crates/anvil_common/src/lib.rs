//! Shared foundational types used across the Anvil build orchestrator.
//!
//! This crate provides content fingerprints for change detection and the
//! path normalization rules every other crate relies on when a path is used
//! as a key or rendered for the user.

#![warn(missing_docs)]

pub mod fingerprint;
pub mod path;

pub use fingerprint::{Fingerprint, ParseFingerprintError};
pub use path::{join_module, normalize_path};
