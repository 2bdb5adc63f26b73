//! Project hooks run before and after the build.

use std::path::Path;

use anvil_config::{ConfigError, ProjectBuilder, ProjectConfig};
use anvil_toolchain::Toolchain;

use crate::error::BuildError;
use crate::runner::ToolRunner;

/// What a post-build hook gets to see.
pub struct PostBuildContext<'a> {
    /// The frozen project settings.
    pub config: &'a ProjectConfig,
    /// The toolchain used for the build.
    pub toolchain: &'a Toolchain,
    /// The staged binary.
    pub binary: &'a Path,
    /// The project directory.
    pub project_dir: &'a Path,
    /// Runner for any tools the hook needs.
    pub runner: &'a dyn ToolRunner,
}

/// Customization points around a build.
///
/// `pre_build` may append to the project settings before they are frozen.
/// `post_build` runs after a successful link; its errors become warnings.
pub trait BuildHooks: Send + Sync {
    /// Adjusts the settings before compilation.
    fn pre_build(&self, _builder: &mut ProjectBuilder) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Post-processes the linked binary.
    fn post_build(&self, _ctx: &PostBuildContext<'_>) -> Result<(), BuildError> {
        Ok(())
    }
}

/// The default hooks: no pre-build changes, strip the binary when requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct StockHooks;

impl BuildHooks for StockHooks {
    fn post_build(&self, ctx: &PostBuildContext<'_>) -> Result<(), BuildError> {
        if ctx.config.strip() {
            strip_binary(ctx.runner, &ctx.toolchain.strip, ctx.binary, ctx.project_dir)?;
        }
        Ok(())
    }
}

/// Runs the toolchain's strip tool on `binary`.
pub fn strip_binary(
    runner: &dyn ToolRunner,
    strip: &str,
    binary: &Path,
    cwd: &Path,
) -> Result<(), BuildError> {
    let args = vec![binary.to_string_lossy().into_owned()];
    let status = runner.run(strip, &args, cwd).map_err(|e| BuildError::Spawn {
        program: strip.to_string(),
        source: e,
    })?;
    if status != 0 {
        return Err(BuildError::Tool {
            program: strip.to_string(),
            status,
        });
    }
    tracing::debug!(binary = %binary.display(), "stripped");
    Ok(())
}
