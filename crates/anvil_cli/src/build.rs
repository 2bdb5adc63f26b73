//! `anvil build`: incremental builds of the selected platform variants.
//!
//! Each variant gets its own [`BuildDriver`]. Several variants are built in
//! parallel; a single variant build is sequential.

use std::path::Path;

use anvil_build::{BuildDriver, BuildError, BuildEvent, Phase, ProcessRunner, Reporter};
use anvil_config::AnvilConfig;
use rayon::prelude::*;

use crate::project::{resolve_project_root, select_variants};
use crate::reporter::make_reporter;
use crate::{BuildArgs, GlobalArgs};

/// Result of building one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutcome {
    /// The variant name.
    pub variant: String,
    /// 0 on success, otherwise the failing phase's status.
    pub status: i32,
}

/// Runs the `anvil build` command.
///
/// Returns the first non-zero variant status in variant order, or 0.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = match anvil_config::load_config(&project_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(BuildError::from(e).status());
        }
    };
    let variants = select_variants(&config, &args.variants, args.all)?;

    let reporter = make_reporter(global, variants.len() > 1);
    let outcomes = build_variants(&project_dir, &config, &variants, reporter.as_ref());

    if !global.quiet && outcomes.len() > 1 {
        let failed: Vec<_> = outcomes
            .iter()
            .filter(|o| o.status != 0)
            .map(|o| o.variant.as_str())
            .collect();
        if failed.is_empty() {
            eprintln!("Built {} variants", outcomes.len());
        } else {
            eprintln!("Failed variants: {}", failed.join(", "));
        }
    }
    Ok(overall_status(&outcomes))
}

/// Builds every variant, in parallel when there are several.
///
/// Outcomes are returned in the order of `variants`.
pub fn build_variants(
    project_dir: &Path,
    config: &AnvilConfig,
    variants: &[String],
    reporter: &dyn Reporter,
) -> Vec<VariantOutcome> {
    variants
        .par_iter()
        .map(|variant| VariantOutcome {
            variant: variant.clone(),
            status: build_variant(project_dir, config, variant, reporter),
        })
        .collect()
}

/// Builds one variant and returns its exit status.
fn build_variant(
    project_dir: &Path,
    config: &AnvilConfig,
    variant: &str,
    reporter: &dyn Reporter,
) -> i32 {
    let prepared = anvil_config::resolve_variant(config, variant)
        .map_err(BuildError::from)
        .and_then(|resolved| {
            let toolchain = anvil_toolchain::load_toolchain(&resolved.toolchain)?.resolve()?;
            Ok((resolved, toolchain))
        });
    let (resolved, toolchain) = match prepared {
        Ok(prepared) => prepared,
        Err(error) => {
            tracing::debug!(%variant, %error, "could not prepare variant");
            reporter.report(
                variant,
                &BuildEvent::PhaseFailed {
                    phase: Phase::PreBuild,
                    status: error.status(),
                    message: error.to_string(),
                },
            );
            return error.status();
        }
    };
    tracing::info!(%variant, toolchain = %toolchain.kind, "building variant");

    let runner = ProcessRunner;
    let report = BuildDriver::new(project_dir, toolchain, &runner, reporter).run(resolved.to_builder());
    report.exit_code()
}

/// The first non-zero status in variant order, or 0.
pub fn overall_status(outcomes: &[VariantOutcome]) -> i32 {
    outcomes
        .iter()
        .map(|o| o.status)
        .find(|&s| s != 0)
        .unwrap_or(0)
}
