//! core
//!
//! Domain types and pure logic, independent of any particular git backend.
//!
//! # Modules
//!
//! - [`types`] - Validated `Oid` and `BranchName` newtypes
//! - [`ancestry`] - Memoizing reachability oracle over the commit graph
//! - [`version`] - Dotted numeric release versions
//! - [`release`] - Release config file and pre-flight validation
//! - [`changelog`] - Generated changelog parsing and notes rendering
//!
//! Nothing in this module performs I/O against a repository; the commit
//! graph is reached only through the [`ancestry::CommitGraph`] capability,
//! which keeps everything here testable with in-memory fakes.

pub mod ancestry;
pub mod changelog;
pub mod release;
pub mod types;
pub mod version;
