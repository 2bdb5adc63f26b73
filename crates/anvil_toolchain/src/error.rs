//! Error types for toolchain lookup.

/// Errors that can occur while selecting or resolving a toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The toolchain name is not one of the built-in kinds.
    #[error("unknown toolchain '{name}'. Supported: {supported}")]
    Unknown {
        /// The requested name.
        name: String,
        /// Comma-separated list of accepted names.
        supported: String,
    },

    /// A tool could not be found on `PATH`.
    #[error("{tool} not found on PATH (looked for '{program}')")]
    NotFound {
        /// The role of the tool (e.g., "C compiler").
        tool: &'static str,
        /// The program name that was searched for.
        program: String,
    },
}
