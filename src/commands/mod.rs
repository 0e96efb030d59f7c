//! Command implementations
//!
//! Commands are `impl Repository` blocks, organized into two categories following
//! Git's architecture:
//!
//! - `plumbing`: Low-level commands for direct object access (hash-object, cat-file)
//! - `porcelain`: User-facing commands for the write path (init, add, commit, rm --cached)
//!
//! Plumbing commands provide building blocks, while porcelain commands compose
//! them into higher-level operations.

pub mod plumbing;
pub mod porcelain;
