//! Anvil CLI, the command-line front end of the Anvil build orchestrator.
//!
//! Provides `anvil build` for incremental builds of one or more platform
//! variants, `anvil clean` for removing build outputs and `anvil init` for
//! project scaffolding.

#![warn(missing_docs)]

mod build;
mod clean;
mod init;
mod project;
mod reporter;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Anvil, an incremental C/C++ build orchestrator.
#[derive(Parser, Debug)]
#[command(name = "anvil", version, about = "Incremental C/C++ builds")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to an `anvil.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// How build progress is printed.
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one or more platform variants.
    Build(BuildArgs),
    /// Remove build outputs.
    Clean(CleanArgs),
    /// Create a new Anvil project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,

        /// Toolchain of the generated variant.
        #[arg(short, long, default_value = "system")]
        toolchain: String,
    },
}

/// Arguments for the `anvil build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Variant to build; may be repeated.
    #[arg(long = "variant", value_name = "NAME")]
    pub variants: Vec<String>,

    /// Build every variant in `anvil.toml`.
    #[arg(long, conflicts_with = "variants")]
    pub all: bool,
}

/// Arguments for the `anvil clean` subcommand.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Variant whose outputs are removed; may be repeated. Without it every
    /// output is removed.
    #[arg(long = "variant", value_name = "NAME")]
    pub variants: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Progress output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable terminal output.
    Human,
    /// One JSON object per line on stdout.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// How progress is printed.
    pub message_format: MessageFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    init_tracing(cli.quiet, cli.verbose, color);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        message_format: cli.message_format,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
        Command::Init { name, toolchain } => init::run(name, &toolchain),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log level for the given verbosity flags; `RUST_LOG` overrides it.
fn default_log_level(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(quiet: bool, verbose: bool, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(quiet, verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .init();
}
