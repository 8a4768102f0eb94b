//! cli::commands::cut
//!
//! Cut a release candidate: pick a version and a commit, run hooks, commit
//! the updated release files on a detached HEAD, push the candidate branch,
//! and open the merge PR.
//!
//! # Ordering
//!
//! Local state is fully settled before anything touches the network beyond
//! the initial fetches: the candidate commit exists and the original branch
//! is restored before the push, and the push happens before the PR call.
//! A forge failure therefore leaves a pushed branch that can be PR'd by
//! hand.

use anyhow::{anyhow, bail, Result};

use crate::cli::args::ReleaseOpts;
use crate::cli::Context;
use crate::core::ancestry::AncestryOracle;
use crate::core::changelog::Changelog;
use crate::core::release::ReleaseConfig;
use crate::core::types::{BranchName, Oid};
use crate::core::version::Version;
use crate::forge::{create_forge, CreatePrRequest, Forge};
use crate::git::Git;
use crate::hooks::{run_hook, HookError};
use crate::ui::output::{self, Verbosity};
use crate::ui::progress::with_spinner;
use crate::ui::prompts;

use super::{selectable_commits, validate};

/// Body for every candidate PR. Squashing or rebasing the candidate would
/// rewrite the recorded release commit out of existence.
const PR_BODY: &str = "### This PR must be merged by merge commit";

/// Bump mode labels offered for the leading version slots.
const BUMP_MODES: [&str; 4] = ["Major", "Minor", "Patch", "Build"];

/// Run the `cut` command.
pub fn cut(ctx: &Context, opts: &ReleaseOpts, hooks: &[String]) -> Result<()> {
    let verbosity = ctx.verbosity();
    let git = Git::open(ctx.dir())?;
    git.ensure_clean()?;

    let original_branch = git.current_branch()?;

    let mut oracle = AncestryOracle::new(&git);
    let validated = validate(&git, &mut oracle, opts, verbosity)?;
    let mut config = validated.config;

    // Interactive selection of the release parameters.
    let version = select_version(&config.version, ctx.interactive)?;
    let commit = select_commit(
        &git,
        &mut oracle,
        &config,
        &validated.development,
        ctx.interactive,
    )?;
    let notes = select_notes(ctx.interactive)?;

    config.version = version;
    config.commit = commit;
    config.notes = notes;

    output::print("----- Release parameters -----", verbosity);
    output::print(&config, verbosity);
    if !prompts::confirm("Does this look accurate", true, ctx.interactive)? {
        bail!("release aborted");
    }

    let version_str = config.version.to_string();

    // Build the candidate on a detached HEAD at the chosen commit.
    git.checkout_detached(&config.commit)?;
    let result = build_candidate(&git, &config, hooks, opts, verbosity);

    // Whatever happened, put the operator back on their branch.
    if let Some(branch) = &original_branch {
        if let Err(err) = git.checkout_branch(branch) {
            output::warn(
                format!("could not restore branch '{branch}': {err}"),
                verbosity,
            );
        }
    }
    let candidate = result?;

    let pr = open_pull_request(ctx, opts, &git, &candidate, &version_str)?;
    output::print(format!("PR created successfully: {}", pr.url), verbosity);
    output::print(
        "You can merge now or apply patches to the candidate branch as needed.",
        verbosity,
    );
    output::print("Reminder: do not squash or rebase!", verbosity);

    Ok(())
}

/// Everything that happens on the detached HEAD: hooks, release files, the
/// candidate commit, and the push. Returns the pushed candidate branch.
fn build_candidate(
    git: &Git,
    config: &ReleaseConfig,
    hooks: &[String],
    opts: &ReleaseOpts,
    verbosity: Verbosity,
) -> Result<BranchName> {
    let workdir = git.workdir()?.to_path_buf();
    let version_str = config.version.to_string();

    for hook in hooks {
        let outcome = with_spinner(format!("Running '{hook}'"), verbosity, || {
            run_hook(hook, &config.version, &workdir)
        });
        if let Err(err) = outcome {
            if let HookError::Failed { stdout, stderr, .. } = &err {
                if !stdout.is_empty() {
                    output::print(stdout.trim_end(), verbosity);
                }
                if !stderr.is_empty() {
                    output::warn(stderr.trim_end(), verbosity);
                }
            }
            return Err(err.into());
        }
    }

    let changelog = Changelog::load(&workdir, &version_str)?;
    let notes = changelog.render_notes(&version_str, &config.notes);
    let notes_path = config
        .path()
        .parent()
        .map(|dir| dir.join("notes.md"))
        .unwrap_or_else(|| workdir.join("notes.md"));
    std::fs::write(&notes_path, notes)?;
    config.store()?;

    git.stage_all()?;
    git.commit_on_head(&format!("Set release candidate for v{version_str}"))?;

    let candidate = BranchName::new(format!("release/candidate/v{version_str}"))?;
    with_spinner(format!("Pushing {candidate}"), verbosity, || {
        git.push_head(&opts.remote, &candidate)
    })?;

    Ok(candidate)
}

/// Open the merge PR for a pushed candidate branch.
fn open_pull_request(
    ctx: &Context,
    opts: &ReleaseOpts,
    git: &Git,
    candidate: &BranchName,
    version: &str,
) -> Result<crate::forge::PullRequest> {
    let url = git
        .remote_url(&opts.remote)?
        .ok_or_else(|| anyhow!("remote '{}' has no URL", opts.remote))?;

    let token = match std::env::var("GITHUB_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => prompts::password("Enter a GitHub token: ", ctx.interactive)?,
    };
    let forge = create_forge(&url, token)?;

    let request = CreatePrRequest {
        head: candidate.to_string(),
        base: opts.target.clone(),
        title: format!("Merge release candidate for v{version}"),
        body: PR_BODY.to_string(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(forge.create_pr(request))?)
}

/// Prompt for the next version.
///
/// The operator can pick a bump mode by number or name prefix, accept the
/// default (Patch, or the last slot for short schemes), or type an explicit
/// version. Explicit versions must be greater than the previous one;
/// changing the slot count requires confirmation.
fn select_version(previous: &Version, interactive: bool) -> Result<Version> {
    let slot_count = previous.slot_count();
    let mut modes: Vec<String> = BUMP_MODES
        .iter()
        .take(slot_count)
        .map(|m| m.to_string())
        .collect();
    for pos in modes.len()..slot_count {
        modes.push(format!("Digit{}", pos + 1));
    }
    let default_pos = 2.min(slot_count - 1);

    println!("Current version is {previous}. Bump modes:");
    for (pos, mode) in modes.iter().enumerate() {
        println!(" [{}] {} -> {}", pos + 1, mode, previous.bump(pos));
    }

    loop {
        let answer = prompts::input(
            &format!("Select a mode or type a version [{}]: ", modes[default_pos]),
            interactive,
        )?;
        let answer = answer.trim();

        let next = if answer.is_empty() {
            previous.bump(default_pos)
        } else if let Ok(n) = answer.parse::<usize>() {
            if n < 1 || n > modes.len() {
                println!("No such mode: {n}");
                continue;
            }
            previous.bump(n - 1)
        } else if let Some(pos) = modes
            .iter()
            .position(|m| m.to_lowercase().starts_with(&answer.to_lowercase()))
        {
            previous.bump(pos)
        } else {
            match Version::parse(answer) {
                Ok(version) => version,
                Err(err) => {
                    println!("Not a version: {err}");
                    continue;
                }
            }
        };

        if next <= *previous {
            println!("The next version must be greater than {previous}");
            continue;
        }
        if next.slot_count() != slot_count
            && !prompts::confirm(
                &format!("'{next}' does not match the previous version scheme. Use it anyway"),
                false,
                interactive,
            )?
        {
            continue;
        }

        return Ok(next);
    }
}

/// Prompt for the commit to cut the release from.
///
/// Offers the commits between the last release and the development tip,
/// newest first, defaulting to the tip.
fn select_commit<'g>(
    git: &'g Git,
    oracle: &mut AncestryOracle<&'g Git>,
    config: &ReleaseConfig,
    development: &Oid,
    interactive: bool,
) -> Result<Oid> {
    let commits = selectable_commits(git, oracle, config, development)?;
    if commits.is_empty() {
        bail!("no commits since the last release");
    }

    let lines: Vec<String> = commits.iter().map(output::format_commit_line).collect();
    let index = prompts::select("Select a release commit:", &lines, Some(0), interactive)?;
    Ok(commits[index].oid.clone())
}

/// Prompt for free-form release notes, typed in or read from a file.
fn select_notes(interactive: bool) -> Result<String> {
    if !prompts::confirm("Add additional release notes", false, interactive)? {
        return Ok(String::new());
    }

    if prompts::confirm("Read the notes from a file", false, interactive)? {
        let path = prompts::input("Enter a file: ", interactive)?;
        return Ok(std::fs::read_to_string(path.trim())?);
    }

    Ok(prompts::multiline(
        "Type in release notes (end with EOF / Ctrl-D):",
        interactive,
    )?)
}
