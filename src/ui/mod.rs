//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`prompts`] - Interactive prompts and confirmations
//! - [`progress`] - Spinner for long-running external operations
//!
//! # Design
//!
//! All output and prompts go through this module so quiet and
//! non-interactive modes behave consistently. The spinner never shares
//! state with the operation it decorates beyond a stop flag.

pub mod output;
pub mod progress;
pub mod prompts;
