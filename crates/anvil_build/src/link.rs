//! Linking staged objects into the platform binary.

use std::path::PathBuf;

use anvil_config::ProjectConfig;

use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::runner::{display_command, ToolRunner};
use crate::stage::stage_file;

/// Every staged object of the given modules, module by module, sorted within each.
///
/// A module without an object directory contributes nothing.
pub fn collect_objects(layout: &BuildLayout, modules: &[String]) -> Result<Vec<PathBuf>, BuildError> {
    let mut objects = Vec::new();
    for module in modules {
        let dir = layout.object_dir(module);
        if !dir.is_dir() {
            continue;
        }
        let mut found = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(BuildError::io(&dir))? {
            let path = entry.map_err(BuildError::io(&dir))?.path();
            let is_object = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(layout.object_suffix()));
            if is_object && path.is_file() {
                found.push(path);
            }
        }
        found.sort();
        objects.extend(found);
    }
    Ok(objects)
}

/// Links the staged objects of one platform and stages the binary.
pub struct Linker<'a> {
    runner: &'a dyn ToolRunner,
    layout: &'a BuildLayout,
}

impl<'a> Linker<'a> {
    /// Creates a linker for `layout`.
    pub fn new(runner: &'a dyn ToolRunner, layout: &'a BuildLayout) -> Self {
        Self { runner, layout }
    }

    /// `-o <transient> <objects> -L<dir>... -l<lib>...`
    pub fn arguments(&self, objects: &[PathBuf], config: &ProjectConfig) -> Vec<String> {
        let mut args = vec!["-o".to_string(), self.layout.transient_binary_name()];
        args.extend(objects.iter().map(|o| self.layout.relative(o)));
        args.extend(config.library_directories().iter().map(|d| format!("-L{d}")));
        args.extend(config.libraries().iter().map(|l| format!("-l{l}")));
        args
    }

    /// Runs `program` over every staged object and stages the result.
    ///
    /// Returns the canonical binary path. Nothing is staged if the linker fails.
    pub fn link(&self, program: &str, config: &ProjectConfig) -> Result<PathBuf, BuildError> {
        let objects = collect_objects(self.layout, config.modules())?;
        let args = self.arguments(&objects, config);
        tracing::debug!("{}", display_command(program, &args));
        let status = self
            .runner
            .run(program, &args, self.layout.project_dir())
            .map_err(|e| BuildError::Spawn {
                program: program.to_string(),
                source: e,
            })?;
        if status != 0 {
            return Err(BuildError::Link {
                binary: self.layout.binary_name().to_string(),
                status,
            });
        }
        let transient = self
            .layout
            .project_dir()
            .join(self.layout.transient_binary_name());
        stage_file(&transient, &self.layout.build_dir(), self.layout.binary_name())
    }
}
