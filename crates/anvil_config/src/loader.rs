//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::AnvilConfig;
use std::path::Path;

/// File name of the project file inside a project directory.
pub const CONFIG_FILE_NAME: &str = "anvil.toml";

/// Loads and validates `anvil.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<AnvilConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `anvil.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<AnvilConfig, ConfigError> {
    let config: AnvilConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AnvilConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.variants.is_empty() {
        return Err(ConfigError::MissingField("variants".to_string()));
    }
    for (name, variant) in &config.variants {
        if variant.toolchain.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "variant '{name}' has an empty toolchain name"
            )));
        }
    }
    if let Some(exts) = &config.project.cxx_extensions {
        if let Some(bad) = exts.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(ConfigError::ValidationError(format!(
                "C++ extension '{bad}' must start with '.'"
            )));
        }
    }
    Ok(())
}
