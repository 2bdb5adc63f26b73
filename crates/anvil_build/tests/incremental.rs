//! Integration tests for incremental rebuilds.
//!
//! Every test builds a throwaway project through [`BuildDriver`] with a fake
//! tool runner, so no real compiler is needed.

mod common;

use std::fs;

use anvil_build::{BuildDriver, BuildError, BuildEvent, BuildHooks, CollectingReporter, Language, Phase};
use anvil_config::{ConfigError, ProjectBuilder};
use anvil_toolchain::{load_toolchain, Toolchain};
use common::*;

// ============================================================================
// Rebuild behaviour
// ============================================================================

#[test]
fn second_build_compiles_nothing_and_touching_one_file_compiles_one() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();

    let first = build(dir.path(), &runner, &reporter);
    assert!(first.is_success(), "{:?}", first.error);
    assert_eq!(first.exit_code(), 0);
    assert_eq!(runner.compiled_sources(), vec!["src/core/a.c", "src/core/b.cpp"]);
    assert!(object(dir.path(), "a.c").is_file());
    assert!(object(dir.path(), "b.cpp").is_file());
    assert_eq!(first.binary.as_deref(), Some(binary(dir.path()).as_path()));
    let linked = fs::read(binary(dir.path())).unwrap();

    runner.reset();
    let second = build(dir.path(), &runner, &reporter);
    assert!(second.is_success());
    assert!(runner.compile_calls().is_empty());
    assert_eq!(second.up_to_date, 2);
    assert_eq!(fs::read(binary(dir.path())).unwrap(), linked);

    fs::write(dir.path().join("src/core/a.c"), "int a(void) { return 42; }\n").unwrap();
    runner.reset();
    let third = build(dir.path(), &runner, &reporter);
    assert!(third.is_success());
    assert_eq!(runner.compiled_sources(), vec!["src/core/a.c"]);
    assert_eq!(third.compiled, vec!["src/core/a.c"]);
    assert_eq!(third.up_to_date, 1);
    assert!(leftover_transients(dir.path()).is_empty());
}

#[test]
fn link_runs_even_when_nothing_changed() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    build(dir.path(), &runner, &reporter);

    runner.reset();
    build(dir.path(), &runner, &reporter);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "g++");
    assert_eq!(
        calls[0].args,
        vec![
            "-o",
            "linux_hello",
            "object/linux/core/a.c.o",
            "object/linux/core/b.cpp.o"
        ]
    );
}

#[test]
fn c_batch_is_compiled_before_cxx_batch() {
    let dir = scenario_project();
    fs::write(dir.path().join("src/core/0.cpp"), "int z() { return 0; }\n").unwrap();
    let runner = FakeRunner::new();
    build(dir.path(), &runner, &CollectingReporter::new());

    let programs: Vec<_> = runner
        .compile_calls()
        .into_iter()
        .map(|c| (c.program.clone(), c.source().unwrap_or_default().to_string()))
        .collect();
    assert_eq!(
        programs,
        vec![
            ("gcc".to_string(), "src/core/a.c".to_string()),
            ("g++".to_string(), "src/core/0.cpp".to_string()),
            ("g++".to_string(), "src/core/b.cpp".to_string()),
        ]
    );
}

#[test]
fn new_source_is_added_to_manifest() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    build(dir.path(), &runner, &reporter);
    assert_eq!(manifest(dir.path()).len(), 2);

    fs::write(dir.path().join("src/core/c.c"), "int c(void) { return 3; }\n").unwrap();
    runner.reset();
    let report = build(dir.path(), &runner, &reporter);
    assert_eq!(report.compiled, vec!["src/core/c.c"]);

    let manifest = manifest(dir.path());
    assert_eq!(manifest.len(), 3);
    for key in ["src/core/a.c", "src/core/b.cpp", "src/core/c.c"] {
        assert!(manifest.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn deleted_object_is_rebuilt() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    build(dir.path(), &runner, &reporter);

    fs::remove_file(object(dir.path(), "b.cpp")).unwrap();
    runner.reset();
    build(dir.path(), &runner, &reporter);
    assert_eq!(runner.compiled_sources(), vec!["src/core/b.cpp"]);
    assert!(object(dir.path(), "b.cpp").is_file());
}

#[test]
fn corrupt_manifest_record_only_rebuilds_that_source() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    build(dir.path(), &runner, &CollectingReporter::new());

    let text = fs::read_to_string(manifest_path(dir.path())).unwrap();
    let corrupted: String = text
        .lines()
        .map(|line| {
            if line.starts_with("src/core/a.c:") {
                "src/core/a.c:abc\n".to_string()
            } else {
                format!("{line}\n")
            }
        })
        .collect();
    fs::write(manifest_path(dir.path()), corrupted).unwrap();

    runner.reset();
    let reporter = CollectingReporter::new();
    let report = build(dir.path(), &runner, &reporter);
    assert!(report.is_success());
    assert_eq!(report.compiled, vec!["src/core/a.c"]);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("corrupt"), "{}", report.warnings[0]);
    assert!(reporter
        .events_for(PLATFORM)
        .iter()
        .any(|e| matches!(e, BuildEvent::Warning { .. })));
    assert_eq!(manifest(dir.path()).len(), 2);
    assert_eq!(manifest(dir.path()).discarded(), 0);
}

#[test]
fn non_utf8_manifest_record_only_rebuilds_that_source() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    build(dir.path(), &runner, &CollectingReporter::new());

    let text = fs::read_to_string(manifest_path(dir.path())).unwrap();
    let mut corrupted = Vec::new();
    for line in text.lines() {
        if line.starts_with("src/core/a.c:") {
            corrupted.extend_from_slice(b"src/core/\xff\xfe.c:deadbeef\n");
        } else {
            corrupted.extend_from_slice(format!("{line}\n").as_bytes());
        }
    }
    fs::write(manifest_path(dir.path()), corrupted).unwrap();

    runner.reset();
    let report = build(dir.path(), &runner, &CollectingReporter::new());
    assert!(report.is_success(), "{:?}", report.error);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.compiled, vec!["src/core/a.c"]);
    assert_eq!(report.warnings.len(), 1);

    // The rewritten manifest is clean, so the next build compiles nothing.
    assert_eq!(manifest(dir.path()).len(), 2);
    assert_eq!(manifest(dir.path()).discarded(), 0);
    runner.reset();
    let report = build(dir.path(), &runner, &CollectingReporter::new());
    assert!(report.compiled.is_empty());
}

#[test]
fn platforms_keep_separate_outputs() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    build(dir.path(), &runner, &reporter);

    let mut win = ProjectBuilder::new(PROJECT, "win64");
    win.add_source_directory("src").add_module_directory("core");
    runner.reset();
    let report = build_with(dir.path(), &runner, &reporter, win, toolchain());
    assert!(report.is_success());
    assert_eq!(report.compiled.len(), 2);
    assert!(dir.path().join("object/win64/core/a.c.o").is_file());
    assert!(dir.path().join("build/win64/hello").is_file());
    assert!(dir.path().join(".anvil/win64.fingerprints").is_file());
    assert_eq!(runner.compile_calls()[0].args[1], "win64_a.c.o");

    runner.reset();
    build(dir.path(), &runner, &reporter);
    assert!(runner.compile_calls().is_empty());
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn phases_are_reported_in_order() {
    let dir = scenario_project();
    let reporter = CollectingReporter::new();
    build(dir.path(), &FakeRunner::new(), &reporter);

    let phases: Vec<_> = reporter
        .events_for(PLATFORM)
        .into_iter()
        .filter_map(|e| match e {
            BuildEvent::PhaseStarted { phase } => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![Phase::PreBuild, Phase::Compile, Phase::Link, Phase::PostBuild]
    );
    assert!(matches!(
        reporter.events_for(PLATFORM).last(),
        Some(BuildEvent::Finished { compiled: 2, .. })
    ));
}

#[test]
fn progress_is_per_language_batch() {
    let dir = scenario_project();
    fs::write(dir.path().join("src/core/c.c"), "int c(void);\n").unwrap();
    fs::write(dir.path().join("src/core/d.c"), "int d(void);\n").unwrap();
    let reporter = CollectingReporter::new();
    build(dir.path(), &FakeRunner::new(), &reporter);

    let progress: Vec<_> = reporter
        .events_for(PLATFORM)
        .into_iter()
        .filter_map(|e| match e {
            BuildEvent::Compiling {
                language,
                file,
                percent,
            } => Some((language, file, percent)),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress,
        vec![
            (Language::C, "src/core/a.c".to_string(), 33),
            (Language::C, "src/core/c.c".to_string(), 67),
            (Language::C, "src/core/d.c".to_string(), 100),
            (Language::Cxx, "src/core/b.cpp".to_string(), 100),
        ]
    );
}

#[test]
fn foreign_files_are_ignored_with_event() {
    let dir = scenario_project();
    fs::write(dir.path().join("src/core/README.txt"), "docs").unwrap();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    let report = build(dir.path(), &runner, &reporter);

    assert!(report.is_success());
    assert_eq!(report.ignored, vec!["src/core/README.txt"]);
    assert!(reporter.events_for(PLATFORM).contains(&BuildEvent::IgnoredFile {
        file: "src/core/README.txt".into()
    }));
    assert_eq!(runner.compile_calls().len(), 2);
}

// ============================================================================
// Toolchains and hooks
// ============================================================================

fn tcc() -> Toolchain {
    Toolchain {
        binary_suffix: String::new(),
        ..load_toolchain("tcc").unwrap()
    }
}

#[test]
fn toolchain_without_cxx_ignores_cxx_sources() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let report = build_with(dir.path(), &runner, &CollectingReporter::new(), builder(), tcc());

    assert!(report.is_success(), "{:?}", report.error);
    assert_eq!(report.compiled, vec!["src/core/a.c"]);
    assert_eq!(report.ignored, vec!["src/core/b.cpp"]);
    assert!(runner.calls().iter().all(|c| c.program == "tcc"));
    assert!(!object(dir.path(), "b.cpp").exists());
}

#[test]
fn strip_runs_after_link_when_enabled() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let mut builder = builder();
    builder.strip(true);
    let report = build_with(dir.path(), &runner, &CollectingReporter::new(), builder, toolchain());

    assert!(report.is_success());
    let last = runner.calls().pop().unwrap();
    assert_eq!(last.program, "strip");
    assert_eq!(last.args, vec![binary(dir.path()).to_string_lossy().into_owned()]);
}

struct DefineHook;

impl BuildHooks for DefineHook {
    fn pre_build(&self, builder: &mut ProjectBuilder) -> Result<(), ConfigError> {
        builder.add_define("FROM_HOOK=1");
        Ok(())
    }
}

#[test]
fn pre_build_hook_changes_flags() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    let report = BuildDriver::new(dir.path(), toolchain(), &runner, &reporter)
        .with_hooks(&DefineHook)
        .run(builder());

    assert!(report.is_success());
    for call in runner.compile_calls() {
        assert!(call.args.contains(&"-DFROM_HOOK=1".to_string()), "{call:?}");
    }
}

struct FailingPostBuild;

impl BuildHooks for FailingPostBuild {
    fn post_build(&self, _ctx: &anvil_build::PostBuildContext<'_>) -> Result<(), BuildError> {
        Err(BuildError::Tool {
            program: "sign".into(),
            status: 3,
        })
    }
}

#[test]
fn post_build_failure_is_a_warning() {
    let dir = scenario_project();
    let runner = FakeRunner::new();
    let reporter = CollectingReporter::new();
    let report = BuildDriver::new(dir.path(), toolchain(), &runner, &reporter)
        .with_hooks(&FailingPostBuild)
        .run(builder());

    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("sign"));
    assert!(binary(dir.path()).is_file());
}
