//! Invoking the compiler for one source file.

use std::path::PathBuf;

use anvil_config::ProjectConfig;

use crate::discover::SourceFile;
use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::runner::{display_command, ToolRunner};

/// The compiler's output before staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientObject {
    /// Where the compiler wrote the object.
    pub path: PathBuf,
    /// File name of the object at its canonical location.
    pub canonical_name: String,
}

/// `-I`, `-D` and raw flags, in that order, one argument each.
pub fn compile_flags(config: &ProjectConfig) -> Vec<String> {
    let includes = config.include_directories().iter().map(|d| format!("-I{d}"));
    let defines = config.defines().iter().map(|d| format!("-D{d}"));
    includes
        .chain(defines)
        .chain(config.additional_flags().iter().cloned())
        .collect()
}

/// Progress of the `index`-th (1-based) file of `total`, rounded to a whole percent.
pub fn percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let rounded = (200 * index + total) / (2 * total);
    rounded.min(100) as u8
}

/// Runs the compiler for single sources.
pub struct CompilerInvoker<'a> {
    runner: &'a dyn ToolRunner,
    layout: &'a BuildLayout,
    flags: Vec<String>,
}

impl<'a> CompilerInvoker<'a> {
    /// Creates an invoker using `flags` for every compilation.
    pub fn new(runner: &'a dyn ToolRunner, layout: &'a BuildLayout, flags: Vec<String>) -> Self {
        Self {
            runner,
            layout,
            flags,
        }
    }

    /// The argument list for compiling `source`.
    pub fn arguments(&self, source: &SourceFile) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            self.layout.transient_object_name(&source.file_name),
            "-c".to_string(),
            source.key.clone(),
        ];
        args.extend(self.flags.iter().cloned());
        args
    }

    /// Compiles `source` with `program` into a transient object in the project directory.
    ///
    /// A non-zero exit is returned as [`BuildError::Compile`] carrying the
    /// compiler's exit code.
    pub fn compile(
        &self,
        program: &str,
        source: &SourceFile,
    ) -> Result<TransientObject, BuildError> {
        let args = self.arguments(source);
        tracing::debug!("{}", display_command(program, &args));
        let status = self
            .runner
            .run(program, &args, self.layout.project_dir())
            .map_err(|e| BuildError::Spawn {
                program: program.to_string(),
                source: e,
            })?;
        if status != 0 {
            return Err(BuildError::Compile {
                file: source.key.clone(),
                status,
            });
        }
        let transient_name = self.layout.transient_object_name(&source.file_name);
        Ok(TransientObject {
            path: self.layout.project_dir().join(&transient_name),
            canonical_name: self.layout.canonical_name(&transient_name).to_string(),
        })
    }
}
