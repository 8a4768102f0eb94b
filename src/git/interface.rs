//! git::interface
//!
//! Git interface implementation using git2.
//!
//! # Architecture
//!
//! The `Git` struct is the single doorway to all Git operations. No other
//! module imports `git2` directly. This keeps error handling consistent and
//! keeps strong types (`Oid`, `BranchName`) at the boundary.
//!
//! The interface also implements [`CommitGraph`], which is how the ancestry
//! oracle reads parent edges without knowing anything about git2.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::ancestry::{CommitGraph, GraphError};
use crate::core::types::{BranchName, Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Working tree has uncommitted or untracked changes.
    #[error("working tree has unsaved changes: {details}")]
    DirtyWorktree {
        /// Description of what's dirty
        details: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context.contains("ref") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidBranchName(msg) => GitError::Internal { message: msg },
        }
    }
}

/// Information about a commit, for display and ordering.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Author name
    pub author_name: String,
    /// Committer timestamp (used for display ordering, newest first)
    pub time: chrono::DateTime<chrono::Utc>,
}

/// The Git interface.
///
/// All repository reads and writes flow through here.
///
/// # Example
///
/// ```ignore
/// use relcut::git::Git;
/// use std::path::Path;
///
/// let git = Git::open(Path::new("."))?;
/// let tip = git.fetch("origin", "master")?;
/// let parents = git.commit_parents(&tip)?;
/// ```
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Path to the working directory root.
    pub fn workdir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The commit HEAD currently points at.
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self.repo.head().map_err(GitError::internal)?;
        let commit = head.peel_to_commit().map_err(GitError::internal)?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    /// The branch HEAD is on, or `None` when detached.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        if self.repo.head_detached().map_err(GitError::internal)? {
            return Ok(None);
        }
        let head = self.repo.head().map_err(GitError::internal)?;
        match head.shorthand() {
            Some(name) if head.is_branch() => Ok(Some(BranchName::new(name)?)),
            _ => Ok(None),
        }
    }

    /// Fail unless the working tree is clean, untracked files included.
    ///
    /// # Errors
    ///
    /// [`GitError::DirtyWorktree`] describing what is dirty.
    pub fn ensure_clean(&self) -> Result<(), GitError> {
        let mut options = git2::StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(GitError::internal)?;

        if statuses.is_empty() {
            return Ok(());
        }

        let mut untracked = 0usize;
        let mut modified = 0usize;
        for entry in statuses.iter() {
            if entry.status().contains(git2::Status::WT_NEW) {
                untracked += 1;
            } else {
                modified += 1;
            }
        }

        Err(GitError::DirtyWorktree {
            details: format!("{modified} changed, {untracked} untracked"),
        })
    }

    // =========================================================================
    // Refs and Remotes
    // =========================================================================

    /// Resolve a fully-qualified ref to the commit it points at.
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;
        let commit = reference.peel_to_commit().map_err(GitError::internal)?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Fetch one branch from a remote and return the fetched tip.
    ///
    /// Updates `refs/remotes/<remote>/<branch>` and resolves it.
    pub fn fetch(&self, remote: &str, branch: &BranchName) -> Result<Oid, GitError> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitError::from_git2(e, remote))?;

        let refspec = format!(
            "+refs/heads/{branch}:refs/remotes/{}/{branch}",
            remote.name().unwrap_or("origin"),
        );
        let tracking = format!(
            "refs/remotes/{}/{branch}",
            remote.name().unwrap_or("origin")
        );

        let mut options = git2::FetchOptions::new();
        options.remote_callbacks(self.remote_callbacks());
        remote
            .fetch(&[refspec.as_str()], Some(&mut options), None)
            .map_err(|e| GitError::from_git2(e, &refspec))?;

        self.resolve_ref(&tracking)
    }

    /// Push HEAD to `refs/heads/<branch>` on a remote.
    ///
    /// Used for publishing the candidate branch from a detached HEAD.
    pub fn push_head(&self, remote: &str, branch: &BranchName) -> Result<(), GitError> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitError::from_git2(e, remote))?;

        let refspec = format!("HEAD:refs/heads/{branch}");
        let mut options = git2::PushOptions::new();
        options.remote_callbacks(self.remote_callbacks());

        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| GitError::from_git2(e, &refspec))
    }

    /// Get the URL for a remote, or `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::internal(e)),
        }
    }

    /// Credential callbacks for network operations.
    ///
    /// Tries the SSH agent for SSH remotes and the configured credential
    /// helper otherwise; local path remotes need neither.
    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let config = self.repo.config().ok();
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |url, username_from_url, allowed| {
            if allowed.contains(git2::CredentialType::SSH_KEY) {
                return git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
            }
            if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(config) = config.as_ref() {
                    return git2::Cred::credential_helper(config, url, username_from_url);
                }
            }
            git2::Cred::default()
        });
        callbacks
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Get the parent OIDs of a commit.
    ///
    /// Returns an empty vec for root commits, multiple OIDs for merges.
    pub fn commit_parents(&self, oid: &Oid) -> Result<Vec<Oid>, GitError> {
        let commit = self.find_commit(oid)?;
        let mut parents = Vec::new();
        for parent in commit.parents() {
            parents.push(Oid::new(parent.id().to_string())?);
        }
        Ok(parents)
    }

    /// Get display information about a commit.
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        let commit = self.find_commit(oid)?;

        let time = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH);

        let info = CommitInfo {
            oid: oid.clone(),
            summary: commit.summary().unwrap_or("").to_string(),
            author_name: commit.author().name().unwrap_or("").to_string(),
            time,
        };
        Ok(info)
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;
        self.repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    // =========================================================================
    // Worktree Mutations
    // =========================================================================

    /// Detach HEAD at a commit and force the worktree to match it.
    ///
    /// Untracked files are removed; the candidate must be built from the
    /// chosen commit's tree exactly.
    pub fn checkout_detached(&self, oid: &Oid) -> Result<(), GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        self.repo
            .set_head_detached(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force().remove_untracked(true);
        self.repo
            .checkout_head(Some(&mut checkout))
            .map_err(GitError::internal)
    }

    /// Check out an existing local branch, forcing the worktree.
    pub fn checkout_branch(&self, branch: &BranchName) -> Result<(), GitError> {
        let refname = format!("refs/heads/{branch}");
        self.repo
            .set_head(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        self.repo
            .checkout_head(Some(&mut checkout))
            .map_err(GitError::internal)
    }

    /// Stage every change in the worktree, including deletions.
    ///
    /// Hooks may touch arbitrary files, so the whole index is rebuilt
    /// before the candidate commit.
    pub fn stage_all(&self) -> Result<(), GitError> {
        let mut index = self.repo.index().map_err(GitError::internal)?;
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .map_err(GitError::internal)?;
        index
            .update_all(["*"].iter(), None)
            .map_err(GitError::internal)?;
        index.write().map_err(GitError::internal)
    }

    /// Commit the current index on top of HEAD and return the new commit.
    pub fn commit_on_head(&self, message: &str) -> Result<Oid, GitError> {
        let signature = self.repo.signature().map_err(GitError::internal)?;
        let mut index = self.repo.index().map_err(GitError::internal)?;
        let tree_oid = index.write_tree().map_err(GitError::internal)?;
        let tree = self.repo.find_tree(tree_oid).map_err(GitError::internal)?;
        let parent = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(GitError::internal)?;

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &[&parent],
            )
            .map_err(GitError::internal)?;

        Ok(Oid::new(oid.to_string())?)
    }

    // =========================================================================
    // Remote URL Parsing
    // =========================================================================

    /// Parse a remote URL into owner/repo for GitHub.
    ///
    /// Handles both HTTPS and SSH URLs:
    /// - `https://github.com/owner/repo.git` -> `Some(("owner", "repo"))`
    /// - `git@github.com:owner/repo.git` -> `Some(("owner", "repo"))`
    ///
    /// Returns `None` for non-GitHub URLs.
    ///
    /// # Example
    ///
    /// ```
    /// use relcut::git::Git;
    ///
    /// assert_eq!(
    ///     Git::parse_github_remote("git@github.com:owner/repo.git"),
    ///     Some(("owner".to_string(), "repo".to_string()))
    /// );
    /// assert_eq!(Git::parse_github_remote("https://gitlab.com/o/r.git"), None);
    /// ```
    pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
        if let Some(rest) = url.strip_prefix("https://github.com/") {
            return Self::parse_owner_repo(rest);
        }
        if let Some(rest) = url.strip_prefix("git@github.com:") {
            return Self::parse_owner_repo(rest);
        }
        if let Some(rest) = url.strip_prefix("ssh://git@github.com/") {
            return Self::parse_owner_repo(rest);
        }
        None
    }

    /// Parse "owner/repo.git" or "owner/repo" into (owner, repo).
    fn parse_owner_repo(path: &str) -> Option<(String, String)> {
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, repo) = path.split_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some((owner.to_string(), repo.to_string()))
    }
}

impl CommitGraph for Git {
    fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError> {
        self.commit_parents(id).map_err(|err| match err {
            GitError::ObjectNotFound { oid } | GitError::InvalidOid { oid } => {
                GraphError::UnknownCommit(oid)
            }
            other => GraphError::Backend(other.to_string()),
        })
    }
}
