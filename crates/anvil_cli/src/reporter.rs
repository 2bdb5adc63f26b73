//! Terminal and JSON presentation of build events.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use anvil_build::{BuildEvent, Reporter};
use serde::Serialize;

use crate::{GlobalArgs, MessageFormat};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const RESET: &str = "\x1b[0m";

/// Creates the reporter selected by `--message-format`.
pub fn make_reporter(global: &GlobalArgs, several_variants: bool) -> Box<dyn Reporter> {
    match global.message_format {
        MessageFormat::Human => Box::new(TerminalReporter {
            color: global.color,
            quiet: global.quiet,
            verbose: global.verbose,
            show_platform: several_variants,
            lock: Mutex::new(()),
        }),
        MessageFormat::Json => Box::new(JsonReporter),
    }
}

/// Prints progress lines such as `[ 50%] CC: src/core/a.c` to stderr.
pub struct TerminalReporter {
    /// Wrap lines in ANSI color codes.
    pub color: bool,
    /// Only print failures.
    pub quiet: bool,
    /// Also print phase boundaries and staged artifacts.
    pub verbose: bool,
    /// Prefix every line with the platform name.
    pub show_platform: bool,
    lock: Mutex<()>,
}

impl TerminalReporter {
    /// The line printed for `event`, if any.
    pub fn render(&self, platform: &str, event: &BuildEvent) -> Option<String> {
        let (color, text) = match event {
            BuildEvent::PhaseFailed {
                phase,
                status,
                message,
            } => (RED, format!("error: {phase} failed ({status}): {message}")),
            _ if self.quiet => return None,
            BuildEvent::Compiling {
                language,
                file,
                percent,
            } => (MAGENTA, format!("[{percent:>3}%] {}: {file}", language.label())),
            BuildEvent::Linking { binary } => (MAGENTA, format!("Linking {binary}")),
            BuildEvent::IgnoredFile { file } => (YELLOW, format!("warning: ignoring {file}")),
            BuildEvent::Warning { message } => (YELLOW, format!("warning: {message}")),
            BuildEvent::UpToDate { count: 0 } => return None,
            BuildEvent::UpToDate { count } => ("", format!("{count} file(s) up to date")),
            BuildEvent::Finished {
                elapsed_ms,
                compiled,
            } => (
                GREEN,
                format!(
                    "Finished in {:.2}s ({compiled} compiled)",
                    *elapsed_ms as f64 / 1000.0
                ),
            ),
            BuildEvent::PhaseStarted { phase } if self.verbose => ("", format!("-- {phase}")),
            BuildEvent::Staged { artifact } if self.verbose => ("", format!("Staged {artifact}")),
            BuildEvent::PhaseStarted { .. } | BuildEvent::Staged { .. } => return None,
        };
        let prefix = if self.show_platform {
            format!("{platform}: ")
        } else {
            String::new()
        };
        if self.color && !color.is_empty() {
            Some(format!("{prefix}{color}{text}{RESET}"))
        } else {
            Some(format!("{prefix}{text}"))
        }
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, platform: &str, event: &BuildEvent) {
        if let Some(line) = self.render(platform, event) {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            eprintln!("{line}");
        }
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    platform: &'a str,
    #[serde(flatten)]
    event: &'a BuildEvent,
}

/// Prints every event as one JSON object per line on stdout.
pub struct JsonReporter;

impl JsonReporter {
    /// The JSON line for `event`.
    pub fn render(platform: &str, event: &BuildEvent) -> serde_json::Result<String> {
        serde_json::to_string(&JsonLine { platform, event })
    }
}

impl Reporter for JsonReporter {
    fn report(&self, platform: &str, event: &BuildEvent) {
        match Self::render(platform, event) {
            Ok(line) => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{line}");
            }
            Err(e) => tracing::error!(%e, "could not serialize build event"),
        }
    }
}
