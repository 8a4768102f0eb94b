//! cli::commands::check
//!
//! Pre-flight validation as a standalone command. Useful in CI to catch a
//! diverged release branch or a rewritten history before anyone tries to
//! cut a candidate.

use anyhow::Result;

use crate::cli::args::ReleaseOpts;
use crate::cli::Context;
use crate::core::ancestry::AncestryOracle;
use crate::git::Git;
use crate::ui::output;

use super::validate;

/// Run the `check` command.
pub fn check(ctx: &Context, opts: &ReleaseOpts) -> Result<()> {
    let verbosity = ctx.verbosity();
    let git = Git::open(ctx.dir())?;
    let mut oracle = AncestryOracle::new(&git);

    let validated = validate(&git, &mut oracle, opts, verbosity)?;

    output::print("Pre-flight validation passed", verbosity);
    output::print(
        format!(
            "Last release: v{} at {}",
            validated.config.version,
            validated.config.commit.short(12)
        ),
        verbosity,
    );
    output::print(
        format!(
            "Release branch '{}' is at {}, behind development '{}' at {}",
            opts.target,
            validated.release.short(12),
            opts.source,
            validated.development.short(12)
        ),
        verbosity,
    );

    Ok(())
}
