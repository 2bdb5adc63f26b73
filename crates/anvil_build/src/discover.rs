//! Source discovery and language classification.

use std::fmt;
use std::path::{Path, PathBuf};

use anvil_common::{join_module, normalize_path};
use anvil_config::ConfigError;
use serde::Serialize;

use crate::error::BuildError;

/// Which compiler a source file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Plain C, compiled with the C compiler.
    C,
    /// C++, compiled with the C++ compiler.
    Cxx,
}

impl Language {
    /// Short label shown next to progress lines.
    pub fn label(self) -> &'static str {
        match self {
            Language::C => "CC",
            Language::Cxx => "CXX",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cxx => write!(f, "C++"),
        }
    }
}

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The module the file belongs to.
    pub module: String,
    /// Path relative to the project directory, `/`-separated. Used as the manifest key.
    pub key: String,
    /// The bare file name.
    pub file_name: String,
    /// How the file is compiled.
    pub language: Language,
}

impl SourceFile {
    /// Absolute path of the file given the project directory.
    pub fn path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.key)
    }
}

/// The result of scanning every module directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Sources grouped by module in configured order, sorted within each module.
    pub sources: Vec<SourceFile>,
    /// Files that are neither C nor C++, as normalized paths.
    pub ignored: Vec<String>,
}

/// Classifies a file name by extension.
///
/// Configured C++ extensions are matched case-sensitively and take priority;
/// `.c` is always C.
pub fn classify(file_name: &str, cxx_extensions: &[String]) -> Option<Language> {
    let has_suffix = |ext: &str| file_name.len() > ext.len() && file_name.ends_with(ext);
    if cxx_extensions.iter().any(|ext| has_suffix(ext)) {
        Some(Language::Cxx)
    } else if has_suffix(".c") {
        Some(Language::C)
    } else {
        None
    }
}

/// Lists the immediate files of each module under `source_root`.
///
/// `source_root` and the returned keys are relative to `project_dir`. A module
/// directory that does not exist is a configuration error.
pub fn discover_sources(
    project_dir: &Path,
    source_root: &str,
    modules: &[String],
    cxx_extensions: &[String],
) -> Result<Discovery, BuildError> {
    let mut discovery = Discovery::default();
    for module in modules {
        let relative_dir = join_module(Path::new(source_root), module);
        let dir = project_dir.join(&relative_dir);
        if !dir.is_dir() {
            return Err(ConfigError::MissingModule {
                module: module.clone(),
                path: normalize_path(&relative_dir),
            }
            .into());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(BuildError::io(&dir))? {
            let entry = entry.map_err(BuildError::io(&dir))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let key = normalize_path(&relative_dir.join(&file_name));
            entries.push((key, file_name));
        }
        entries.sort();

        for (key, file_name) in entries {
            match classify(&file_name, cxx_extensions) {
                Some(language) => discovery.sources.push(SourceFile {
                    module: module.clone(),
                    key,
                    file_name,
                    language,
                }),
                None => {
                    tracing::debug!(file = %key, "ignoring non-source file");
                    discovery.ignored.push(key);
                }
            }
        }
    }
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        [".cpp", ".C", ".cc", ".cxx"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn classify_by_extension() {
        let exts = exts();
        assert_eq!(classify("a.c", &exts), Some(Language::C));
        assert_eq!(classify("a.cpp", &exts), Some(Language::Cxx));
        assert_eq!(classify("a.C", &exts), Some(Language::Cxx));
        assert_eq!(classify("a.cc", &exts), Some(Language::Cxx));
        assert_eq!(classify("a.h", &exts), None);
        assert_eq!(classify("Makefile", &exts), None);
        assert_eq!(classify(".c", &exts), None);
    }

    #[test]
    fn classify_without_cxx_support() {
        assert_eq!(classify("a.cpp", &[]), None);
        assert_eq!(classify("a.C", &[]), None);
        assert_eq!(classify("a.c", &[]), Some(Language::C));
    }

    #[test]
    fn discover_sorted_and_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("src/core");
        std::fs::create_dir_all(core.join("nested")).unwrap();
        std::fs::write(core.join("b.cpp"), "").unwrap();
        std::fs::write(core.join("a.c"), "").unwrap();
        std::fs::write(core.join("notes.txt"), "").unwrap();
        std::fs::write(core.join("nested/deep.c"), "").unwrap();

        let found =
            discover_sources(dir.path(), "src", &["core".to_string()], &exts()).unwrap();
        let keys: Vec<_> = found.sources.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["src/core/a.c", "src/core/b.cpp"]);
        assert_eq!(found.sources[0].language, Language::C);
        assert_eq!(found.sources[1].language, Language::Cxx);
        assert_eq!(found.sources[1].module, "core");
        assert_eq!(found.sources[1].file_name, "b.cpp");
        assert_eq!(found.ignored, vec!["src/core/notes.txt"]);
    }

    #[test]
    fn root_module_is_source_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.c"), "").unwrap();
        let found = discover_sources(dir.path(), "src", &[".".to_string()], &exts()).unwrap();
        assert_eq!(found.sources.len(), 1);
        assert_eq!(found.sources[0].key, "src/main.c");
        assert_eq!(
            found.sources[0].path_in(dir.path()),
            dir.path().join("src/main.c")
        );
    }

    #[test]
    fn modules_keep_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        for module in ["util", "core"] {
            std::fs::create_dir_all(dir.path().join("src").join(module)).unwrap();
            std::fs::write(dir.path().join("src").join(module).join("x.c"), "").unwrap();
        }
        let modules = vec!["util".to_string(), "core".to_string()];
        let found = discover_sources(dir.path(), "src", &modules, &exts()).unwrap();
        let keys: Vec<_> = found.sources.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["src/util/x.c", "src/core/x.c"]);
    }

    #[test]
    fn missing_module_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        let err = discover_sources(dir.path(), "src", &["gone".to_string()], &exts())
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Config(ConfigError::MissingModule { ref module, ref path })
                if module == "gone" && path == "src/gone"
        ));
        assert_eq!(err.status(), 2);
    }
}
