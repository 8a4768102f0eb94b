//! cli
//!
//! Command-line interface.
//!
//! # Architecture
//!
//! The CLI layer parses arguments, builds a [`Context`] from the global
//! flags, and dispatches to one command implementation. Commands return
//! `anyhow::Result` so typed errors from the lower layers surface with
//! their context chains intact; the binary turns them into an exit code.
//!
//! # Modules
//!
//! - [`args`] - Argument definitions (clap derive)
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Global execution context derived from the top-level flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory to run in; defaults to the current directory.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode enabled.
    pub quiet: bool,
    /// Whether prompts are allowed.
    pub interactive: bool,
}

impl Context {
    /// The directory commands operate in.
    pub fn dir(&self) -> &Path {
        self.cwd.as_deref().unwrap_or(Path::new("."))
    }

    /// Output verbosity for this invocation.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = args::Cli::parse_args();
    let ctx = Context {
        interactive: cli.interactive(),
        cwd: cli.cwd,
        debug: cli.debug,
        quiet: cli.quiet,
    };
    commands::dispatch(cli.command, &ctx)
}
