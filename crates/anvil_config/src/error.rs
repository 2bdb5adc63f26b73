//! Error types for configuration loading and validation.

/// Errors that can occur when loading, resolving, or finishing a project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A referenced variant name does not exist in the configuration.
    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The build needs exactly one source directory.
    #[error("exactly one source directory is supported, found {found}")]
    SourceDirectories {
        /// How many source directories were configured.
        found: usize,
    },

    /// A configured module has no directory under the source root.
    #[error("module '{module}' not found at {path}")]
    MissingModule {
        /// The module name as configured.
        module: String,
        /// The directory that was expected to exist.
        path: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
