//! cli::commands
//!
//! Command implementations.
//!
//! # Shared flow
//!
//! Every command starts the same way: open the repository, fetch the
//! development and release branches, load the release config, and run the
//! pre-flight validation through the ancestry oracle. The oracle is created
//! once per command so the cache warmed by validation is reused by the
//! selection-list query.

mod check;
mod cut;
mod list;

pub use check::check;
pub use cut::cut;
pub use list::list;

use anyhow::{Context as _, Result};

use crate::core::ancestry::AncestryOracle;
use crate::core::release::{ReleaseConfig, ReleaseError};
use crate::core::types::{BranchName, Oid};
use crate::git::{CommitInfo, Git};
use crate::ui::output::{self, Verbosity};
use crate::ui::progress::with_spinner;

use super::args::{Command, ReleaseOpts};
use super::Context;

/// Dispatch a parsed command.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Cut { opts, hooks } => cut(ctx, &opts, &hooks),
        Command::Check { opts } => check(ctx, &opts),
        Command::List { opts } => list(ctx, &opts),
    }
}

/// Fetched branch tips plus the validated release config.
pub(crate) struct Validated {
    pub config: ReleaseConfig,
    pub development: Oid,
    pub release: Oid,
}

/// Fetch both branches, load the config, and run pre-flight validation.
///
/// Leaves the oracle cache warm for the selection-list query.
pub(crate) fn validate<'g>(
    git: &'g Git,
    oracle: &mut AncestryOracle<&'g Git>,
    opts: &ReleaseOpts,
    verbosity: Verbosity,
) -> Result<Validated> {
    let source = BranchName::new(&opts.source)?;
    let target = BranchName::new(&opts.target)?;

    let development = with_spinner(format!("Fetching {source}"), verbosity, || {
        git.fetch(&opts.remote, &source)
    })
    .with_context(|| format!("failed to fetch '{source}' from '{}'", opts.remote))?;

    let release = with_spinner(format!("Fetching {target}"), verbosity, || {
        git.fetch(&opts.remote, &target)
    })
    .with_context(|| format!("failed to fetch '{target}' from '{}'", opts.remote))?;

    output::debug(format!("development tip {development}"), verbosity);
    output::debug(format!("release tip {release}"), verbosity);

    let config_path = git.workdir()?.join(&opts.config);
    let config = ReleaseConfig::load(&config_path)?;

    // The recorded commit has to exist locally before the oracle walks it.
    git.commit_parents(&config.commit)
        .map_err(|_| ReleaseError::BadCommit(config.commit.to_string()))?;

    config.pre_validate(oracle, &development, &release)?;

    Ok(Validated {
        config,
        development,
        release,
    })
}

/// The commits eligible as the next release point, newest first.
///
/// These are the commits strictly between the last release and the
/// development tip, plus the tip itself.
pub(crate) fn selectable_commits<'g>(
    git: &'g Git,
    oracle: &mut AncestryOracle<&'g Git>,
    config: &ReleaseConfig,
    development: &Oid,
) -> Result<Vec<CommitInfo>> {
    let mut candidates = oracle.commits_between(&config.commit, development)?;
    candidates.push(development.clone());

    let mut infos = Vec::with_capacity(candidates.len());
    for oid in &candidates {
        infos.push(git.commit_info(oid)?);
    }
    infos.sort_by(|a, b| b.time.cmp(&a.time));
    Ok(infos)
}
