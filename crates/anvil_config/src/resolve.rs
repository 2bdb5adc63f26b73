//! Variant resolution: merging project-wide and variant-specific settings.

use crate::error::ConfigError;
use crate::project::ProjectBuilder;
use crate::types::AnvilConfig;

/// A platform variant with project and variant settings merged.
///
/// List settings are concatenated with the project entries first. Scalar
/// settings (`strip`, `binary_suffix`) take the variant value when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    /// The project name.
    pub project_name: String,
    /// The variant (platform) name.
    pub platform: String,
    /// Toolchain name to load.
    pub toolchain: String,
    /// Source roots.
    pub sources: Vec<String>,
    /// Module subdirectories.
    pub modules: Vec<String>,
    /// Header search directories.
    pub include_dirs: Vec<String>,
    /// Library search directories.
    pub library_dirs: Vec<String>,
    /// Merged libraries.
    pub libraries: Vec<String>,
    /// Merged defines.
    pub defines: Vec<String>,
    /// Merged flags.
    pub flags: Vec<String>,
    /// C++ extension override.
    pub cxx_extensions: Option<Vec<String>>,
    /// Binary suffix override.
    pub binary_suffix: Option<String>,
    /// Whether to strip the binary.
    pub strip: bool,
}

/// Resolves a named variant against the project-wide settings.
pub fn resolve_variant(
    config: &AnvilConfig,
    variant_name: &str,
) -> Result<ResolvedVariant, ConfigError> {
    let variant = config
        .variants
        .get(variant_name)
        .ok_or_else(|| ConfigError::UnknownVariant(variant_name.to_string()))?;
    let project = &config.project;

    let merged = |base: &[String], extra: &[String]| -> Vec<String> {
        base.iter().chain(extra.iter()).cloned().collect()
    };

    Ok(ResolvedVariant {
        project_name: project.name.clone(),
        platform: variant_name.to_string(),
        toolchain: variant.toolchain.clone(),
        sources: project.sources.clone(),
        modules: project.modules.clone(),
        include_dirs: project.include_dirs.clone(),
        library_dirs: project.library_dirs.clone(),
        libraries: merged(&project.libraries, &variant.libraries),
        defines: merged(&project.defines, &variant.defines),
        flags: merged(&project.flags, &variant.flags),
        cxx_extensions: project.cxx_extensions.clone(),
        binary_suffix: variant.binary_suffix.clone(),
        strip: variant.strip.unwrap_or(project.strip),
    })
}

impl ResolvedVariant {
    /// Seeds a [`ProjectBuilder`] with this variant's settings.
    pub fn to_builder(&self) -> ProjectBuilder {
        let mut builder = ProjectBuilder::new(&self.project_name, &self.platform);
        builder
            .add_source_directory(&self.sources)
            .add_module_directory(&self.modules)
            .add_include_directory(&self.include_dirs)
            .add_library_directory(&self.library_dirs)
            .add_library(&self.libraries)
            .add_define(&self.defines)
            .add_flag(&self.flags)
            .strip(self.strip);
        if let Some(exts) = &self.cxx_extensions {
            builder.cxx_extensions(exts);
        }
        if let Some(suffix) = &self.binary_suffix {
            builder.binary_suffix(suffix);
        }
        builder
    }
}
