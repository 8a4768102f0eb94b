//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the only doorway to Git. All repository reads and writes
//! flow through [`Git`]; no other module imports `git2`. The ancestry
//! oracle sees the repository only through the
//! [`CommitGraph`](crate::core::ancestry::CommitGraph) implementation this
//! module provides.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Worktree cleanliness and HEAD state checks
//! - Fetching and pushing single branches
//! - Commit parent/metadata lookups for the oracle and the selection list
//! - Detached checkout, staging, and the candidate commit
//! - Remote URL parsing for forge selection

mod interface;

pub use interface::{CommitInfo, Git, GitError};
