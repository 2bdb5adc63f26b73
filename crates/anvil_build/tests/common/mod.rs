//! Shared fixtures for the driver integration tests.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anvil_build::{BuildDriver, BuildReport, CollectingReporter, ToolRunner};
use anvil_cache::FingerprintManifest;
use anvil_config::ProjectBuilder;
use anvil_toolchain::{load_toolchain, Toolchain};
use tempfile::TempDir;

pub const PLATFORM: &str = "linux";
pub const PROJECT: &str = "hello";

/// One recorded tool invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

impl Call {
    pub fn is_compile(&self) -> bool {
        self.args.iter().any(|a| a == "-c")
    }

    /// The source argument of a compile call.
    pub fn source(&self) -> Option<&str> {
        let i = self.args.iter().position(|a| a == "-c")?;
        self.args.get(i + 1).map(String::as_str)
    }
}

/// A stand-in for real compilers and linkers.
///
/// Compile calls write `object(<source contents>)` to the `-o` path; link
/// calls write the concatenation of their object inputs. Any call with an
/// argument containing the configured needle fails with the configured status
/// and writes nothing.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<Call>>,
    fail_on: Mutex<Option<(String, i32)>>,
    unspawnable: Mutex<Option<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, needle: &str, status: i32) {
        *self.fail_on.lock().unwrap() = Some((needle.to_string(), status));
    }

    pub fn succeed(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    pub fn cannot_spawn(&self, program: &str) {
        *self.unspawnable.lock().unwrap() = Some(program.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn compile_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_compile).collect()
    }

    pub fn compiled_sources(&self) -> Vec<String> {
        self.compile_calls()
            .iter()
            .filter_map(|c| c.source().map(str::to_string))
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<i32> {
        if self.unspawnable.lock().unwrap().as_deref() == Some(program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        }
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });
        if let Some((needle, status)) = self.fail_on.lock().unwrap().clone() {
            if args.iter().any(|a| a.contains(&needle)) {
                return Ok(status);
            }
        }
        let Some(out) = args.iter().position(|a| a == "-o").and_then(|i| args.get(i + 1)) else {
            return Ok(0);
        };
        let content = if let Some(i) = args.iter().position(|a| a == "-c") {
            format!("object({})", fs::read_to_string(cwd.join(&args[i + 1]))?)
        } else {
            let mut linked = String::new();
            for arg in args.iter().filter(|a| a.ends_with(".o")) {
                linked.push_str(&fs::read_to_string(cwd.join(arg))?);
            }
            linked
        };
        fs::write(cwd.join(out), content)?;
        Ok(0)
    }
}

/// A project with `src/core/a.c` and `src/core/b.cpp`.
pub fn scenario_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let core = dir.path().join("src/core");
    fs::create_dir_all(&core).unwrap();
    fs::write(core.join("a.c"), "int a(void) { return 1; }\n").unwrap();
    fs::write(core.join("b.cpp"), "int b() { return 2; }\n").unwrap();
    dir
}

pub fn builder() -> ProjectBuilder {
    let mut builder = ProjectBuilder::new(PROJECT, PLATFORM);
    builder.add_source_directory("src").add_module_directory("core");
    builder
}

pub fn toolchain() -> Toolchain {
    // The host suffix would make binary paths differ between hosts.
    Toolchain {
        binary_suffix: String::new(),
        ..load_toolchain("gcc").unwrap()
    }
}

pub fn build(dir: &Path, runner: &FakeRunner, reporter: &CollectingReporter) -> BuildReport {
    build_with(dir, runner, reporter, builder(), toolchain())
}

pub fn build_with(
    dir: &Path,
    runner: &FakeRunner,
    reporter: &CollectingReporter,
    builder: ProjectBuilder,
    toolchain: Toolchain,
) -> BuildReport {
    BuildDriver::new(dir, toolchain, runner, reporter).run(builder)
}

pub fn object(dir: &Path, file_name: &str) -> PathBuf {
    dir.join("object").join(PLATFORM).join("core").join(format!("{file_name}.o"))
}

pub fn binary(dir: &Path) -> PathBuf {
    dir.join("build").join(PLATFORM).join(PROJECT)
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(".anvil").join(format!("{PLATFORM}.fingerprints"))
}

pub fn manifest(dir: &Path) -> FingerprintManifest {
    FingerprintManifest::load(&manifest_path(dir)).unwrap()
}

pub fn leftover_transients(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| {
            let name = e.unwrap().file_name().to_string_lossy().into_owned();
            name.starts_with(&format!("{PLATFORM}_")).then_some(name)
        })
        .collect()
}
