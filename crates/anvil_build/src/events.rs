//! Structured progress events and the [`Reporter`] seam.
//!
//! The engine never prints. Everything the user sees goes through a
//! [`Reporter`], which receives the platform name and a [`BuildEvent`].

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::discover::Language;
use crate::driver::Phase;

/// A single progress notification from a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    /// A phase has begun.
    PhaseStarted {
        /// The phase.
        phase: Phase,
    },
    /// A source file is about to be compiled.
    Compiling {
        /// Which compiler is used.
        language: Language,
        /// Normalized source path.
        file: String,
        /// Progress within the current language batch, in percent.
        percent: u8,
    },
    /// A file in a module directory is neither C nor C++.
    IgnoredFile {
        /// Normalized path of the ignored file.
        file: String,
    },
    /// Number of sources skipped because they are up to date.
    UpToDate {
        /// How many sources were skipped.
        count: usize,
    },
    /// The linker is about to run.
    Linking {
        /// File name of the binary.
        binary: String,
    },
    /// An artifact reached its canonical location.
    Staged {
        /// Normalized path of the staged artifact.
        artifact: String,
    },
    /// Something went wrong that does not fail the build.
    Warning {
        /// Human-readable description.
        message: String,
    },
    /// A phase failed and the build stopped.
    PhaseFailed {
        /// The failing phase.
        phase: Phase,
        /// The exit status the build will report.
        status: i32,
        /// Human-readable description.
        message: String,
    },
    /// The build completed successfully.
    Finished {
        /// Wall-clock time of the whole build.
        elapsed_ms: u64,
        /// Number of sources compiled in this run.
        compiled: usize,
    },
}

/// Receives [`BuildEvent`]s as a build progresses.
///
/// Reporters are shared between builds of different platforms running in
/// parallel, so implementations must be thread-safe.
pub trait Reporter: Send + Sync {
    /// Handles one event from the build of `platform`.
    fn report(&self, platform: &str, event: &BuildEvent);
}

/// A reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _platform: &str, _event: &BuildEvent) {}
}

/// A reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<(String, BuildEvent)>>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events received so far, with their platform.
    pub fn events(&self) -> Vec<(String, BuildEvent)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the events received for one platform.
    pub fn events_for(&self, platform: &str) -> Vec<BuildEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(p, _)| p == platform)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, platform: &str, event: &BuildEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((platform.to_string(), event.clone()));
    }
}
