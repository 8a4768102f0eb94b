//! cli::commands::list
//!
//! Print the commits that `cut` would offer for selection, newest first.

use anyhow::Result;

use crate::cli::args::ReleaseOpts;
use crate::cli::Context;
use crate::core::ancestry::AncestryOracle;
use crate::git::Git;
use crate::ui::output;

use super::{selectable_commits, validate};

/// Run the `list` command.
pub fn list(ctx: &Context, opts: &ReleaseOpts) -> Result<()> {
    let verbosity = ctx.verbosity();
    let git = Git::open(ctx.dir())?;
    let mut oracle = AncestryOracle::new(&git);

    let validated = validate(&git, &mut oracle, opts, verbosity)?;
    let commits = selectable_commits(&git, &mut oracle, &validated.config, &validated.development)?;

    output::print(
        format!(
            "{} commit(s) since v{}:",
            commits.len(),
            validated.config.version
        ),
        verbosity,
    );
    for info in &commits {
        // Listed even in quiet mode; the list is the command's output.
        println!("{}", output::format_commit_line(info));
    }

    Ok(())
}
