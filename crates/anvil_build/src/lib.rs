//! The incremental compilation engine of the Anvil build orchestrator.
//!
//! A [`BuildDriver`] takes a [`ProjectBuilder`](anvil_config::ProjectBuilder)
//! and a [`Toolchain`](anvil_toolchain::Toolchain) and runs one platform
//! build through its phases:
//!
//! 1. **Pre-build**: hooks adjust the settings, which are then frozen.
//! 2. **Compile**: sources are discovered ([`discover`]), compared against the
//!    fingerprint manifest ([`detect`]), compiled ([`compile`]) and staged
//!    ([`stage`]). The manifest is flushed at the end of the phase.
//! 3. **Link**: every staged object is linked and the binary staged ([`link`]).
//! 4. **Post-build**: hooks post-process the binary ([`hooks`]).
//!
//! External tools run through the [`ToolRunner`] seam and progress is
//! published as [`BuildEvent`]s to a [`Reporter`].

#![warn(missing_docs)]

pub mod clean;
pub mod compile;
pub mod detect;
pub mod discover;
pub mod driver;
pub mod error;
pub mod events;
pub mod hooks;
pub mod layout;
pub mod link;
pub mod runner;
pub mod stage;

pub use clean::{clean_all, clean_platform};
pub use compile::{compile_flags, percent, CompilerInvoker, TransientObject};
pub use detect::{plan_compilation, CompilePlan, ScheduledSource};
pub use discover::{classify, discover_sources, Discovery, Language, SourceFile};
pub use driver::{BuildDriver, BuildReport, Phase};
pub use error::BuildError;
pub use events::{BuildEvent, CollectingReporter, NullReporter, Reporter};
pub use hooks::{strip_binary, BuildHooks, PostBuildContext, StockHooks};
pub use layout::BuildLayout;
pub use link::{collect_objects, Linker};
pub use runner::{display_command, ProcessRunner, ToolRunner};
pub use stage::{stage_file, stage_object};
