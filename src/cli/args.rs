//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// relcut - promote reviewed commits into versioned release candidates
#[derive(Parser, Debug)]
#[command(name = "relcut")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if relcut was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Options shared by every release command.
#[derive(Args, Debug, Clone)]
pub struct ReleaseOpts {
    /// Development branch to source commits from
    #[arg(long, value_name = "branch", default_value = "master")]
    pub source: String,

    /// Release branch to make the PR against
    #[arg(long, value_name = "branch", default_value = "release/stable")]
    pub target: String,

    /// Remote to fetch from and push to
    #[arg(long, value_name = "name", default_value = "origin")]
    pub remote: String,

    /// Path to the release config, relative to the repository root
    #[arg(long, value_name = "path", default_value = "release/config.json")]
    pub config: PathBuf,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cut a release candidate and open the merge PR
    #[command(
        name = "cut",
        long_about = "Cut a release candidate branch from a chosen commit.\n\n\
            Fetches the development and release branches, validates that the \
            recorded release state is still consistent, then walks through \
            version selection, commit selection, and release notes before \
            pushing a release/candidate/v<version> branch and opening a pull \
            request against the release branch.",
        after_help = "\
WORKFLOW EXAMPLE:
    # Cut a candidate, running a version stamping hook first
    relcut cut --hooks './scripts/stamp-version.sh'

    # Non-default branches
    relcut cut --source develop --target release/stable"
    )]
    Cut {
        #[command(flatten)]
        opts: ReleaseOpts,

        /// Shell commands to run before the candidate commit is made
        #[arg(long = "hooks", value_name = "cmd", num_args = 1..)]
        hooks: Vec<String>,
    },

    /// Validate recorded release state against the fetched branches
    #[command(
        name = "check",
        long_about = "Run the pre-flight validation and report the result.\n\n\
            Verifies that the release branch tip is reachable from the \
            development tip and that the recorded release commit is reachable \
            from the release branch tip. Exits non-zero when either ordering \
            is violated."
    )]
    Check {
        #[command(flatten)]
        opts: ReleaseOpts,
    },

    /// List commits eligible as the next release point
    #[command(
        name = "list",
        long_about = "List the commits between the last release and the \
            development tip, newest first. These are exactly the commits \
            offered for selection by 'relcut cut'."
    )]
    List {
        #[command(flatten)]
        opts: ReleaseOpts,
    },
}
