//! Built-in toolchain capability records.

use crate::error::ToolchainError;
use crate::search::which;
use std::path::PathBuf;

/// The built-in toolchain families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainKind {
    /// The host's default `cc` and `c++`.
    System,
    /// GNU `gcc` and `g++`.
    Gcc,
    /// LLVM `clang` and `clang++`.
    Clang,
    /// Tiny C Compiler. Compiles C only.
    Tcc,
    /// MinGW-w64 cross compiler producing Windows executables.
    Mingw,
}

impl ToolchainKind {
    /// Every kind, in the order they are listed to the user.
    pub const ALL: [ToolchainKind; 5] = [
        ToolchainKind::System,
        ToolchainKind::Gcc,
        ToolchainKind::Clang,
        ToolchainKind::Tcc,
        ToolchainKind::Mingw,
    ];

    /// The canonical name used in `anvil.toml`.
    pub fn name(self) -> &'static str {
        match self {
            ToolchainKind::System => "system",
            ToolchainKind::Gcc => "gcc",
            ToolchainKind::Clang => "clang",
            ToolchainKind::Tcc => "tcc",
            ToolchainKind::Mingw => "mingw",
        }
    }
}

impl std::fmt::Display for ToolchainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the build engine needs to know about a native toolchain.
///
/// Tool fields hold program names (or paths); [`Toolchain::resolve`] turns
/// them into absolute paths found on `PATH`. An empty `cxx_extensions` list
/// means the toolchain cannot compile C++, and linking then goes through the
/// C compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Which built-in family this record came from.
    pub kind: ToolchainKind,
    /// C compiler.
    pub cc: String,
    /// C++ compiler, also used as the linker.
    pub cxx: String,
    /// Static archiver.
    pub archiver: String,
    /// Symbol stripping tool.
    pub strip: String,
    /// File suffixes compiled as C++.
    pub cxx_extensions: Vec<String>,
    /// Suffix appended to the linked binary's name.
    pub binary_suffix: String,
    /// Suffix of object files.
    pub object_suffix: String,
}

impl Toolchain {
    /// Returns `true` if this toolchain compiles C++ sources.
    pub fn supports_cxx(&self) -> bool {
        !self.cxx_extensions.is_empty()
    }

    /// The program used to link objects into a binary.
    pub fn linker(&self) -> &str {
        if self.supports_cxx() {
            &self.cxx
        } else {
            &self.cc
        }
    }

    /// Replaces every tool name with its absolute path on `PATH`.
    ///
    /// The archiver is not used by the build and is left as given when it
    /// cannot be found.
    pub fn resolve(&self) -> Result<Toolchain, ToolchainError> {
        let find = |tool: &'static str, program: &str| -> Result<String, ToolchainError> {
            which(program)
                .map(|p: PathBuf| p.to_string_lossy().into_owned())
                .ok_or_else(|| ToolchainError::NotFound {
                    tool,
                    program: program.to_string(),
                })
        };
        let cc = find("C compiler", &self.cc)?;
        let cxx = if self.supports_cxx() {
            find("C++ compiler", &self.cxx)?
        } else {
            self.cxx.clone()
        };
        let strip = which(&self.strip)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.strip.clone());
        let archiver = which(&self.archiver)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.archiver.clone());
        tracing::debug!(kind = %self.kind, %cc, %cxx, "resolved toolchain");
        Ok(Toolchain {
            cc,
            cxx,
            archiver,
            strip,
            ..self.clone()
        })
    }
}

/// Suffix of executables on the host: `.exe` on Windows, none elsewhere.
pub fn host_binary_suffix() -> &'static str {
    if cfg!(windows) {
        ".exe"
    } else {
        ""
    }
}

fn default_cxx_extensions() -> Vec<String> {
    [".cpp", ".C", ".cc", ".cxx"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn unix_like(kind: ToolchainKind, cc: &str, cxx: &str) -> Toolchain {
    Toolchain {
        kind,
        cc: cc.to_string(),
        cxx: cxx.to_string(),
        archiver: "ar".to_string(),
        strip: "strip".to_string(),
        cxx_extensions: default_cxx_extensions(),
        binary_suffix: host_binary_suffix().to_string(),
        object_suffix: ".o".to_string(),
    }
}

/// Creates the capability record for a named toolchain.
///
/// Names are case-insensitive and accept a few common aliases.
pub fn load_toolchain(name: &str) -> Result<Toolchain, ToolchainError> {
    let toolchain = match name.to_ascii_lowercase().as_str() {
        "system" | "host" | "cc" => unix_like(ToolchainKind::System, "cc", "c++"),
        "gcc" | "gnu" => unix_like(ToolchainKind::Gcc, "gcc", "g++"),
        "clang" | "llvm" => unix_like(ToolchainKind::Clang, "clang", "clang++"),
        "tcc" => Toolchain {
            cxx_extensions: Vec::new(),
            ..unix_like(ToolchainKind::Tcc, "tcc", "tcc")
        },
        "mingw" | "mingw64" | "mingw-w64" => Toolchain {
            archiver: "x86_64-w64-mingw32-ar".to_string(),
            strip: "x86_64-w64-mingw32-strip".to_string(),
            binary_suffix: ".exe".to_string(),
            ..unix_like(
                ToolchainKind::Mingw,
                "x86_64-w64-mingw32-gcc",
                "x86_64-w64-mingw32-g++",
            )
        },
        _ => {
            return Err(ToolchainError::Unknown {
                name: name.to_string(),
                supported: ToolchainKind::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    };
    Ok(toolchain)
}
