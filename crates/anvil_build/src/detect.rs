//! Deciding which sources need recompiling.
//!
//! A source is up to date only when it has a manifest record, the record
//! matches the file's current fingerprint, and its staged object exists.
//! Headers are not tracked: editing a header alone triggers nothing.

use anvil_cache::{FingerprintManifest, SourceHasher};
use anvil_common::Fingerprint;

use crate::discover::{Discovery, Language, SourceFile};
use crate::error::BuildError;
use crate::layout::BuildLayout;

/// A source scheduled for compilation, with the fingerprint it had when planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSource {
    /// The source file.
    pub source: SourceFile,
    /// Its content fingerprint at planning time; recorded once it is staged.
    pub fingerprint: Fingerprint,
}

/// The compile work for one build.
#[derive(Debug, Clone, Default)]
pub struct CompilePlan {
    /// C sources to compile, sorted by path.
    pub c: Vec<ScheduledSource>,
    /// C++ sources to compile, sorted by path.
    pub cxx: Vec<ScheduledSource>,
    /// Sources that can be skipped.
    pub up_to_date: Vec<SourceFile>,
}

impl CompilePlan {
    /// Total number of sources to compile.
    pub fn scheduled(&self) -> usize {
        self.c.len() + self.cxx.len()
    }

    /// The batch for one language.
    pub fn batch(&self, language: Language) -> &[ScheduledSource] {
        match language {
            Language::C => &self.c,
            Language::Cxx => &self.cxx,
        }
    }
}

/// Splits discovered sources into up-to-date files and per-language batches.
pub fn plan_compilation(
    discovery: &Discovery,
    manifest: &FingerprintManifest,
    layout: &BuildLayout,
) -> Result<CompilePlan, BuildError> {
    let mut plan = CompilePlan::default();
    for source in &discovery.sources {
        let fingerprint = SourceHasher::hash_file(&source.path_in(layout.project_dir()))?;
        let object = layout.object_path(&source.module, &source.file_name);
        if manifest.matches(&source.key, &fingerprint) && object.is_file() {
            tracing::debug!(file = %source.key, "up to date");
            plan.up_to_date.push(source.clone());
            continue;
        }
        let scheduled = ScheduledSource {
            source: source.clone(),
            fingerprint,
        };
        match source.language {
            Language::C => plan.c.push(scheduled),
            Language::Cxx => plan.cxx.push(scheduled),
        }
    }
    plan.c.sort_by(|a, b| a.source.key.cmp(&b.source.key));
    plan.cxx.sort_by(|a, b| a.source.key.cmp(&b.source.key));
    Ok(plan)
}
