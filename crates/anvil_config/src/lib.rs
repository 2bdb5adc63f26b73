//! Parsing and validation of `anvil.toml` project files.
//!
//! This crate reads the project file into a strongly-typed [`AnvilConfig`],
//! resolves a named platform variant into a [`ResolvedVariant`], and freezes
//! the accumulated settings into an immutable [`ProjectConfig`] through a
//! [`ProjectBuilder`] during the pre-build step.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod project;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use project::{OneOrMany, ProjectBuilder, ProjectConfig, DEFAULT_CXX_EXTENSIONS};
pub use resolve::{resolve_variant, ResolvedVariant};
pub use types::*;
