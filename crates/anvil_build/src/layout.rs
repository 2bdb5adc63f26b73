//! Where a platform build reads and writes its files.
//!
//! ```text
//! <project>/object/<platform>/<module>/<file><object-suffix>
//! <project>/build/<platform>/<binary>
//! <project>/.anvil/<platform>.fingerprints
//! ```
//!
//! Transient outputs are written to the project directory itself with a
//! `<platform>_` prefix, so builds of different platforms never collide.

use std::path::{Path, PathBuf};

use anvil_common::{join_module, normalize_path};
use anvil_config::ProjectConfig;
use anvil_toolchain::Toolchain;

/// Directory holding staged objects.
pub const OBJECT_DIR: &str = "object";
/// Directory holding staged binaries.
pub const BUILD_DIR: &str = "build";
/// Directory holding persisted build state.
pub const STATE_DIR: &str = ".anvil";
/// Extension of fingerprint manifest files.
pub const MANIFEST_EXTENSION: &str = "fingerprints";

/// Paths used by the build of one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    project_dir: PathBuf,
    platform: String,
    object_suffix: String,
    binary_name: String,
}

impl BuildLayout {
    /// Creates a layout from its parts.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
        object_suffix: impl Into<String>,
        binary_name: impl Into<String>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            platform: platform.into(),
            object_suffix: object_suffix.into(),
            binary_name: binary_name.into(),
        }
    }

    /// The layout for building `config` with `toolchain`.
    pub fn for_project(project_dir: &Path, config: &ProjectConfig, toolchain: &Toolchain) -> Self {
        Self::new(
            project_dir,
            config.platform_name(),
            &toolchain.object_suffix,
            config.binary_name(&toolchain.binary_suffix),
        )
    }

    /// The project directory; also the working directory of every tool.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The platform name.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Suffix appended to object files.
    pub fn object_suffix(&self) -> &str {
        &self.object_suffix
    }

    /// File name of the linked binary.
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// `object/<platform>`.
    pub fn object_root(&self) -> PathBuf {
        determine_object_dir(&self.project_dir, &self.platform)
    }

    /// `object/<platform>/<module>`, or the object root for module `"."`.
    pub fn object_dir(&self, module: &str) -> PathBuf {
        join_module(&self.object_root(), module)
    }

    /// Canonical object file name for a source file name.
    pub fn object_file_name(&self, source_file_name: &str) -> String {
        format!("{source_file_name}{}", self.object_suffix)
    }

    /// Canonical object path for a source file in `module`.
    pub fn object_path(&self, module: &str, source_file_name: &str) -> PathBuf {
        self.object_dir(module)
            .join(self.object_file_name(source_file_name))
    }

    /// Name of the compiler's transient output for a source file name.
    pub fn transient_object_name(&self, source_file_name: &str) -> String {
        format!("{}{}", self.transient_prefix(), self.object_file_name(source_file_name))
    }

    /// Strips the platform prefix from a transient file name.
    pub fn canonical_name<'a>(&self, transient_name: &'a str) -> &'a str {
        transient_name
            .strip_prefix(&self.transient_prefix())
            .unwrap_or(transient_name)
    }

    fn transient_prefix(&self) -> String {
        format!("{}_", self.platform)
    }

    /// `build/<platform>`.
    pub fn build_dir(&self) -> PathBuf {
        determine_build_dir(&self.project_dir, &self.platform)
    }

    /// `build/<platform>/<binary>`.
    pub fn binary_path(&self) -> PathBuf {
        self.build_dir().join(&self.binary_name)
    }

    /// Name of the linker's transient output.
    pub fn transient_binary_name(&self) -> String {
        format!("{}{}", self.transient_prefix(), self.binary_name)
    }

    /// `.anvil/<platform>.fingerprints`.
    pub fn manifest_path(&self) -> PathBuf {
        determine_manifest_path(&self.project_dir, &self.platform)
    }

    /// `path` relative to the project directory, with `/` separators.
    pub fn relative(&self, path: &Path) -> String {
        normalize_path(path.strip_prefix(&self.project_dir).unwrap_or(path))
    }
}

/// `object/<platform>` under `project_dir`.
pub fn determine_object_dir(project_dir: &Path, platform: &str) -> PathBuf {
    project_dir.join(OBJECT_DIR).join(platform)
}

/// `build/<platform>` under `project_dir`.
pub fn determine_build_dir(project_dir: &Path, platform: &str) -> PathBuf {
    project_dir.join(BUILD_DIR).join(platform)
}

/// `.anvil/<platform>.fingerprints` under `project_dir`.
pub fn determine_manifest_path(project_dir: &Path, platform: &str) -> PathBuf {
    project_dir
        .join(STATE_DIR)
        .join(format!("{platform}.{MANIFEST_EXTENSION}"))
}
