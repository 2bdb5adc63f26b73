//! Configuration types deserialized from `anvil.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// The top-level configuration parsed from `anvil.toml`.
///
/// Holds the project-wide settings shared by every variant and the named
/// platform variants themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct AnvilConfig {
    /// Project-wide settings.
    pub project: ProjectSection,
    /// Named platform variants (e.g., "linux", "win64").
    #[serde(default)]
    pub variants: BTreeMap<String, VariantConfig>,
}

/// The `[project]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// The project name, used as the binary name.
    pub name: String,
    /// Source root directories. Exactly one is supported.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
    /// Module subdirectories under the source root.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub modules: Vec<String>,
    /// Header search directories.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub include_dirs: Vec<String>,
    /// Library search directories.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub library_dirs: Vec<String>,
    /// Libraries to link against.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub libraries: Vec<String>,
    /// Preprocessor defines (`NAME` or `NAME=VALUE`).
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub defines: Vec<String>,
    /// Raw compiler flags.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub flags: Vec<String>,
    /// Overrides the set of extensions compiled as C++.
    #[serde(default)]
    pub cxx_extensions: Option<Vec<String>>,
    /// Strip the linked binary after a successful build.
    #[serde(default)]
    pub strip: bool,
}

/// A `[variants.<name>]` table describing one platform variant.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantConfig {
    /// Toolchain name understood by `anvil_toolchain::load_toolchain`.
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
    /// Overrides the toolchain's binary suffix.
    #[serde(default)]
    pub binary_suffix: Option<String>,
    /// Extra defines appended after the project-level defines.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub defines: Vec<String>,
    /// Extra flags appended after the project-level flags.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub flags: Vec<String>,
    /// Extra libraries appended after the project-level libraries.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub libraries: Vec<String>,
    /// Overrides `project.strip` for this variant.
    #[serde(default)]
    pub strip: Option<bool>,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            toolchain: default_toolchain(),
            binary_suffix: None,
            defines: Vec::new(),
            flags: Vec::new(),
            libraries: Vec::new(),
            strip: None,
        }
    }
}

fn default_toolchain() -> String {
    "system".to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `sources = "src"` as well as `sources = ["src"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
