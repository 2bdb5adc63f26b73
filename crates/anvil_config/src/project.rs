//! The accumulating [`ProjectBuilder`] and the frozen [`ProjectConfig`].
//!
//! A build starts from a builder seeded by the project file and the selected
//! variant. Pre-build hooks may append to it; [`ProjectBuilder::finish`] then
//! validates the accumulated settings and produces a [`ProjectConfig`] that
//! cannot be changed for the rest of the build.

use crate::error::ConfigError;

/// Extensions compiled as C++ when the project does not override them.
pub const DEFAULT_CXX_EXTENSIONS: &[&str] = &[".cpp", ".C", ".cc", ".cxx"];

/// A single string or a collection of strings accepted by the `add_*` methods.
pub trait OneOrMany {
    /// Converts the value into the strings it stands for, in order.
    fn into_strings(self) -> Vec<String>;
}

impl OneOrMany for &str {
    fn into_strings(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl OneOrMany for String {
    fn into_strings(self) -> Vec<String> {
        vec![self]
    }
}

impl OneOrMany for &String {
    fn into_strings(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: Into<String>> OneOrMany for Vec<S> {
    fn into_strings(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: AsRef<str>> OneOrMany for &Vec<S> {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> OneOrMany for &[S] {
    fn into_strings(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: Into<String>, const N: usize> OneOrMany for [S; N] {
    fn into_strings(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

/// Mutable project settings, open for appends until [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    project_name: String,
    platform_name: String,
    source_directories: Vec<String>,
    modules: Vec<String>,
    include_directories: Vec<String>,
    library_directories: Vec<String>,
    libraries: Vec<String>,
    defines: Vec<String>,
    additional_flags: Vec<String>,
    cxx_extensions: Option<Vec<String>>,
    binary_suffix: Option<String>,
    strip: bool,
}

impl ProjectBuilder {
    /// Starts a builder for `project_name` targeting the `platform_name` variant.
    pub fn new(project_name: impl Into<String>, platform_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            platform_name: platform_name.into(),
            source_directories: Vec::new(),
            modules: Vec::new(),
            include_directories: Vec::new(),
            library_directories: Vec::new(),
            libraries: Vec::new(),
            defines: Vec::new(),
            additional_flags: Vec::new(),
            cxx_extensions: None,
            binary_suffix: None,
            strip: false,
        }
    }

    /// Appends source root directories.
    pub fn add_source_directory(&mut self, dirs: impl OneOrMany) -> &mut Self {
        self.source_directories.extend(dirs.into_strings());
        self
    }

    /// Appends module subdirectory names.
    pub fn add_module_directory(&mut self, modules: impl OneOrMany) -> &mut Self {
        self.modules.extend(modules.into_strings());
        self
    }

    /// Appends header search directories.
    pub fn add_include_directory(&mut self, dirs: impl OneOrMany) -> &mut Self {
        self.include_directories.extend(dirs.into_strings());
        self
    }

    /// Appends library search directories.
    pub fn add_library_directory(&mut self, dirs: impl OneOrMany) -> &mut Self {
        self.library_directories.extend(dirs.into_strings());
        self
    }

    /// Appends libraries to link against.
    pub fn add_library(&mut self, libs: impl OneOrMany) -> &mut Self {
        self.libraries.extend(libs.into_strings());
        self
    }

    /// Appends preprocessor defines.
    pub fn add_define(&mut self, defines: impl OneOrMany) -> &mut Self {
        self.defines.extend(defines.into_strings());
        self
    }

    /// Appends raw compiler flags.
    pub fn add_flag(&mut self, flags: impl OneOrMany) -> &mut Self {
        self.additional_flags.extend(flags.into_strings());
        self
    }

    /// Replaces the set of extensions compiled as C++.
    pub fn cxx_extensions(&mut self, exts: impl OneOrMany) -> &mut Self {
        self.cxx_extensions = Some(exts.into_strings());
        self
    }

    /// Sets the C++ extensions unless they were already set explicitly.
    ///
    /// The build driver uses this to inherit the toolchain's extension set.
    pub fn default_cxx_extensions(&mut self, exts: impl OneOrMany) -> &mut Self {
        if self.cxx_extensions.is_none() {
            self.cxx_extensions = Some(exts.into_strings());
        }
        self
    }

    /// Overrides the toolchain's binary suffix.
    pub fn binary_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.binary_suffix = Some(suffix.into());
        self
    }

    /// Requests stripping of the linked binary.
    pub fn strip(&mut self, strip: bool) -> &mut Self {
        self.strip = strip;
        self
    }

    /// The platform this builder targets.
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// Validates the accumulated settings and freezes them.
    pub fn finish(self) -> Result<ProjectConfig, ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::MissingField("project.name".to_string()));
        }
        if self.platform_name.trim().is_empty() {
            return Err(ConfigError::MissingField("platform".to_string()));
        }
        if self
            .platform_name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace())
            || self.platform_name == "."
            || self.platform_name == ".."
        {
            return Err(ConfigError::ValidationError(format!(
                "platform name '{}' cannot be used as a directory name",
                self.platform_name
            )));
        }
        if self.source_directories.len() != 1 {
            return Err(ConfigError::SourceDirectories {
                found: self.source_directories.len(),
            });
        }
        let modules = if self.modules.is_empty() {
            vec![".".to_string()]
        } else {
            self.modules
        };
        Ok(ProjectConfig {
            project_name: self.project_name,
            platform_name: self.platform_name,
            source_directories: self.source_directories,
            modules,
            include_directories: self.include_directories,
            library_directories: self.library_directories,
            libraries: self.libraries,
            defines: self.defines,
            additional_flags: self.additional_flags,
            cxx_extensions: self.cxx_extensions.unwrap_or_else(|| {
                DEFAULT_CXX_EXTENSIONS
                    .iter()
                    .map(|e| e.to_string())
                    .collect()
            }),
            binary_suffix: self.binary_suffix,
            strip: self.strip,
        })
    }
}

/// Immutable project settings for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    project_name: String,
    platform_name: String,
    source_directories: Vec<String>,
    modules: Vec<String>,
    include_directories: Vec<String>,
    library_directories: Vec<String>,
    libraries: Vec<String>,
    defines: Vec<String>,
    additional_flags: Vec<String>,
    cxx_extensions: Vec<String>,
    binary_suffix: Option<String>,
    strip: bool,
}

impl ProjectConfig {
    /// The project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The platform variant name.
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// The configured source roots. Always exactly one entry.
    pub fn source_directories(&self) -> &[String] {
        &self.source_directories
    }

    /// The single source root.
    pub fn source_root(&self) -> &str {
        &self.source_directories[0]
    }

    /// Module subdirectories, `["."]` when none were configured.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Header search directories.
    pub fn include_directories(&self) -> &[String] {
        &self.include_directories
    }

    /// Library search directories.
    pub fn library_directories(&self) -> &[String] {
        &self.library_directories
    }

    /// Libraries to link against.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Preprocessor defines.
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Raw compiler flags.
    pub fn additional_flags(&self) -> &[String] {
        &self.additional_flags
    }

    /// Extensions compiled as C++.
    pub fn cxx_extensions(&self) -> &[String] {
        &self.cxx_extensions
    }

    /// The binary suffix override, if any.
    pub fn binary_suffix(&self) -> Option<&str> {
        self.binary_suffix.as_deref()
    }

    /// Whether the linked binary is stripped after the build.
    pub fn strip(&self) -> bool {
        self.strip
    }

    /// File name of the linked binary, using `default_suffix` unless overridden.
    pub fn binary_name(&self, default_suffix: &str) -> String {
        let suffix = self.binary_suffix.as_deref().unwrap_or(default_suffix);
        format!("{}{}", self.project_name, suffix)
    }
}
