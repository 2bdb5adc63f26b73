//! The build state machine.
//!
//! A build moves through `PreBuild → Compile → Link → PostBuild → Done`.
//! Any failure moves it to `Failed`, which records the phase it failed in and
//! the exit status. Phases never overlap and sources are compiled one at a
//! time in sorted order, C before C++.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anvil_cache::{FingerprintManifest, FingerprintRecord};
use anvil_config::{ProjectBuilder, ProjectConfig};
use anvil_toolchain::Toolchain;
use serde::Serialize;

use crate::compile::{compile_flags, percent, CompilerInvoker};
use crate::detect::{plan_compilation, CompilePlan};
use crate::discover::{discover_sources, Language};
use crate::error::BuildError;
use crate::events::{BuildEvent, Reporter};
use crate::hooks::{BuildHooks, PostBuildContext, StockHooks};
use crate::layout::BuildLayout;
use crate::link::Linker;
use crate::runner::ToolRunner;
use crate::stage::stage_object;

static STOCK_HOOKS: StockHooks = StockHooks;

/// A step of the build state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Settings are assembled and frozen.
    PreBuild,
    /// Changed sources are compiled and staged.
    Compile,
    /// Staged objects are linked and the binary staged.
    Link,
    /// Post-processing of the binary.
    PostBuild,
    /// The build succeeded.
    Done,
    /// The build stopped on an error.
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::PreBuild => "pre-build",
            Phase::Compile => "compile",
            Phase::Link => "link",
            Phase::PostBuild => "post-build",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The outcome of one platform build.
#[derive(Debug)]
pub struct BuildReport {
    /// The platform that was built.
    pub platform: String,
    /// Final state: [`Phase::Done`] or [`Phase::Failed`].
    pub phase: Phase,
    /// The phase that failed, if any.
    pub failed_phase: Option<Phase>,
    /// The error that stopped the build, if any.
    pub error: Option<BuildError>,
    /// Sources compiled and recorded in this run, in compile order.
    pub compiled: Vec<String>,
    /// Number of sources skipped as up to date.
    pub up_to_date: usize,
    /// Files found in module directories that are not sources.
    pub ignored: Vec<String>,
    /// The staged binary, once linked.
    pub binary: Option<PathBuf>,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
    /// Wall-clock duration of the build.
    pub elapsed: Duration,
}

impl BuildReport {
    fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            phase: Phase::PreBuild,
            failed_phase: None,
            error: None,
            compiled: Vec::new(),
            up_to_date: 0,
            ignored: Vec::new(),
            binary: None,
            warnings: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Returns `true` if the build reached [`Phase::Done`].
    pub fn is_success(&self) -> bool {
        self.phase == Phase::Done
    }

    /// 0 on success, otherwise the failing phase's status.
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map_or(0, BuildError::status)
    }
}

/// Runs the build of one platform.
pub struct BuildDriver<'a> {
    project_dir: PathBuf,
    toolchain: Toolchain,
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
    hooks: &'a dyn BuildHooks,
    platform: String,
    phase: Phase,
}

impl<'a> BuildDriver<'a> {
    /// Creates a driver building in `project_dir` with `toolchain`.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        toolchain: Toolchain,
        runner: &'a dyn ToolRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            toolchain,
            runner,
            reporter,
            hooks: &STOCK_HOOKS,
            platform: String::new(),
            phase: Phase::PreBuild,
        }
    }

    /// Replaces the stock hooks.
    pub fn with_hooks(mut self, hooks: &'a dyn BuildHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Runs every phase for the settings in `builder`.
    pub fn run(&mut self, builder: ProjectBuilder) -> BuildReport {
        let start = Instant::now();
        self.platform = builder.platform_name().to_string();
        let mut report = BuildReport::new(&self.platform);

        let result = self.run_phases(builder, &mut report);
        report.elapsed = start.elapsed();

        match result {
            Ok(()) => {
                self.phase = Phase::Done;
                report.phase = Phase::Done;
                tracing::info!(
                    platform = %self.platform,
                    compiled = report.compiled.len(),
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "build finished"
                );
                self.emit(BuildEvent::Finished {
                    elapsed_ms: report.elapsed.as_millis() as u64,
                    compiled: report.compiled.len(),
                });
            }
            Err(error) => {
                let failed = self.phase;
                self.phase = Phase::Failed;
                report.phase = Phase::Failed;
                report.failed_phase = Some(failed);
                tracing::info!(platform = %self.platform, phase = %failed, %error, "build failed");
                self.emit(BuildEvent::PhaseFailed {
                    phase: failed,
                    status: error.status(),
                    message: error.to_string(),
                });
                report.error = Some(error);
            }
        }
        report
    }

    fn run_phases(
        &mut self,
        mut builder: ProjectBuilder,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        self.enter(Phase::PreBuild);
        builder.default_cxx_extensions(&self.toolchain.cxx_extensions);
        self.hooks.pre_build(&mut builder)?;
        let config = builder.finish()?;
        let layout = BuildLayout::for_project(&self.project_dir, &config, &self.toolchain);

        self.enter(Phase::Compile);
        self.compile_phase(&config, &layout, report)?;

        self.enter(Phase::Link);
        self.emit(BuildEvent::Linking {
            binary: layout.binary_name().to_string(),
        });
        let binary = Linker::new(self.runner, &layout).link(self.toolchain.linker(), &config)?;
        self.emit(BuildEvent::Staged {
            artifact: layout.relative(&binary),
        });

        self.enter(Phase::PostBuild);
        let ctx = PostBuildContext {
            config: &config,
            toolchain: &self.toolchain,
            binary: &binary,
            project_dir: &self.project_dir,
            runner: self.runner,
        };
        if let Err(e) = self.hooks.post_build(&ctx) {
            self.warn(report, format!("post-build step failed: {e}"));
        }
        report.binary = Some(binary);
        Ok(())
    }

    fn compile_phase(
        &self,
        config: &ProjectConfig,
        layout: &BuildLayout,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let mut manifest = FingerprintManifest::load(&layout.manifest_path())?;
        if manifest.discarded() > 0 {
            self.warn(
                report,
                format!(
                    "discarded {} corrupt record(s) from {}",
                    manifest.discarded(),
                    layout.relative(manifest.path())
                ),
            );
        }

        let cxx_extensions: &[String] = if self.toolchain.supports_cxx() {
            config.cxx_extensions()
        } else {
            &[]
        };
        let discovery = discover_sources(
            &self.project_dir,
            config.source_root(),
            config.modules(),
            cxx_extensions,
        )?;
        for file in &discovery.ignored {
            tracing::warn!(platform = %self.platform, %file, "ignoring file that is not a C or C++ source");
            self.emit(BuildEvent::IgnoredFile { file: file.clone() });
        }
        report.ignored = discovery.ignored.clone();

        let plan = plan_compilation(&discovery, &manifest, layout)?;
        report.up_to_date = plan.up_to_date.len();
        self.emit(BuildEvent::UpToDate {
            count: plan.up_to_date.len(),
        });

        let invoker = CompilerInvoker::new(self.runner, layout, compile_flags(config));
        match self.compile_batches(&plan, &invoker, layout, &mut manifest, report) {
            Ok(()) => manifest.flush().map_err(BuildError::ManifestFlush),
            Err(error) => {
                // Keep what was staged before the failure.
                if let Err(flush) = manifest.flush() {
                    tracing::error!(%flush, "could not record completed sources");
                    self.warn(report, format!("could not write fingerprint manifest: {flush}"));
                }
                Err(error)
            }
        }
    }

    fn compile_batches(
        &self,
        plan: &CompilePlan,
        invoker: &CompilerInvoker<'_>,
        layout: &BuildLayout,
        manifest: &mut FingerprintManifest,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        for language in [Language::C, Language::Cxx] {
            let batch = plan.batch(language);
            let program = match language {
                Language::C => &self.toolchain.cc,
                Language::Cxx => &self.toolchain.cxx,
            };
            for (i, item) in batch.iter().enumerate() {
                self.emit(BuildEvent::Compiling {
                    language,
                    file: item.source.key.clone(),
                    percent: percent(i + 1, batch.len()),
                });
                let object = invoker.compile(program, &item.source)?;
                stage_object(&object, layout, &item.source.module)?;
                manifest.insert(FingerprintRecord::new(&item.source.key, item.fingerprint));
                report.compiled.push(item.source.key.clone());
            }
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        tracing::info!(platform = %self.platform, %phase, "entering phase");
        self.emit(BuildEvent::PhaseStarted { phase });
    }

    fn emit(&self, event: BuildEvent) {
        self.reporter.report(&self.platform, &event);
    }

    fn warn(&self, report: &mut BuildReport, message: String) {
        tracing::warn!(platform = %self.platform, "{message}");
        self.emit(BuildEvent::Warning {
            message: message.clone(),
        });
        report.warnings.push(message);
    }
}
