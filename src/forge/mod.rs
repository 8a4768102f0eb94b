//! forge
//!
//! Abstraction for remote forges (GitHub v1).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for opening the candidate pull
//! request. Forge operations run only after the candidate branch has been
//! pushed; a forge failure leaves local state intact.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod github;
pub mod mock;
mod traits;

pub use traits::{CreatePrRequest, Forge, ForgeError, PrState, PullRequest};

use crate::git::Git;

/// Build a forge for a git remote URL.
///
/// GitHub is the only supported forge; a remote that does not point at
/// GitHub is an error, reported with the offending URL.
pub fn create_forge(remote_url: &str, token: String) -> Result<github::GitHubForge, ForgeError> {
    let (owner, repo) = Git::parse_github_remote(remote_url).ok_or_else(|| {
        ForgeError::NotFound(format!(
            "unable to find a remote GitHub repository in '{remote_url}'"
        ))
    })?;

    Ok(github::GitHubForge::new(token, owner, repo))
}
