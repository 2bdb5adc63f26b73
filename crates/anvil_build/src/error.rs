//! Build failures and the process exit status each one maps to.

use std::path::PathBuf;

use anvil_cache::CacheError;
use anvil_config::ConfigError;
use anvil_toolchain::ToolchainError;

/// Exit status when a staged copy could not be written.
pub const STATUS_STAGE_COPY: i32 = 10;
/// Exit status when a transient file could not be removed after staging.
pub const STATUS_CLEANUP: i32 = 20;
/// Exit status when an output directory could not be created.
pub const STATUS_CREATE_DIR: i32 = 30;
/// Exit status when the fingerprint manifest could not be written.
pub const STATUS_MANIFEST_FLUSH: i32 = 40;
/// Exit status for other filesystem failures (reading sources or object directories).
pub const STATUS_IO: i32 = 50;
/// Exit status for configuration errors.
pub const STATUS_CONFIG: i32 = 2;
/// Exit status when a tool could not be started.
pub const STATUS_SPAWN: i32 = 127;

/// Everything that can stop a build.
///
/// Each variant maps to a distinct exit status through [`BuildError::status`].
/// Compiler and linker failures carry the tool's own exit code so that it can
/// be propagated unchanged.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The project configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The toolchain could not be selected or resolved.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// A source file or the manifest could not be read.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A directory or file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A tool could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler exited with a non-zero status.
    #[error("compiling {file} failed with exit code {status}")]
    Compile {
        /// Normalized path of the source file.
        file: String,
        /// The compiler's exit code.
        status: i32,
    },

    /// An output directory could not be created.
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        /// The directory that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A transient output could not be copied to its canonical location.
    #[error("could not stage {from} to {to}: {source}")]
    StageCopy {
        /// The transient file.
        from: PathBuf,
        /// The canonical destination.
        to: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A transient output was staged but could not be removed afterwards.
    #[error("could not remove transient file {path}: {source}")]
    Cleanup {
        /// The transient file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The linker exited with a non-zero status.
    #[error("linking {binary} failed with exit code {status}")]
    Link {
        /// File name of the binary being linked.
        binary: String,
        /// The linker's exit code.
        status: i32,
    },

    /// The fingerprint manifest could not be written.
    #[error("could not write fingerprint manifest: {0}")]
    ManifestFlush(#[source] CacheError),

    /// A post-build tool exited with a non-zero status.
    #[error("{program} failed with exit code {status}")]
    Tool {
        /// The program that was invoked.
        program: String,
        /// Its exit code.
        status: i32,
    },
}

impl BuildError {
    /// The process exit status for this failure.
    pub fn status(&self) -> i32 {
        match self {
            BuildError::Config(_) => STATUS_CONFIG,
            BuildError::Toolchain(ToolchainError::Unknown { .. }) => STATUS_CONFIG,
            BuildError::Toolchain(ToolchainError::NotFound { .. }) => STATUS_SPAWN,
            BuildError::Cache(_) | BuildError::Io { .. } => STATUS_IO,
            BuildError::Spawn { .. } => STATUS_SPAWN,
            BuildError::Compile { status, .. }
            | BuildError::Link { status, .. }
            | BuildError::Tool { status, .. } => *status,
            BuildError::CreateDir { .. } => STATUS_CREATE_DIR,
            BuildError::StageCopy { .. } => STATUS_STAGE_COPY,
            BuildError::Cleanup { .. } => STATUS_CLEANUP,
            BuildError::ManifestFlush(_) => STATUS_MANIFEST_FLUSH,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> BuildError {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
