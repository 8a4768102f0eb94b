//! relcut
//!
//! Promote reviewed commits into versioned release candidates.
//!
//! # Overview
//!
//! relcut manages the hand-off from a development branch to a stable
//! release branch. It validates that the recorded release state is still
//! consistent with the fetched branch tips, walks the operator through
//! version and commit selection, builds a candidate commit carrying the
//! updated release files, pushes it as `release/candidate/v<version>`,
//! and opens a pull request that must be merged by merge commit.
//!
//! # Architecture
//!
//! The crate is organized in layers, with strict dependencies flowing
//! downward:
//!
//! ```text
//! cli -> core, git, forge, hooks, ui
//! git -> core (implements the commit graph the oracle reads)
//! forge, hooks, ui -> core
//! core -> (nothing above std and serde)
//! ```
//!
//! - [`core`] - Domain types: versions, release config, changelogs, and
//!   the ancestry oracle that answers reachability questions over the
//!   commit graph
//! - [`git`] - The single doorway to git2; no other module touches it
//! - [`forge`] - Pull request creation against GitHub
//! - [`hooks`] - Pre-push shell hook execution
//! - [`ui`] - Output, prompts, and progress spinners
//! - [`cli`] - Argument parsing and command dispatch

pub mod cli;
pub mod core;
pub mod forge;
pub mod git;
pub mod hooks;
pub mod ui;
