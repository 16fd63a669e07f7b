//! sko - Skill template overlay engine.
//!
//! Manages layered, versioned skill template packages that are copied into a
//! target repository's `.claude/` tree and then selectively customized via
//! per-repository overrides, re-derivable on every sync.

pub mod app;
pub mod cli;
pub mod error;
pub mod overlay;
pub mod skills;

pub use error::{Result, SkoError};
