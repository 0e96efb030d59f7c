//! `cairn`: a minimal Git-compatible object store
//!
//! Implements the write path of a Git repository: stage files into a binary `DIRC`
//! index, snapshot the index as nested tree objects, record a commit and advance the
//! branch. Objects are zlib-compressed and addressed by their SHA-1, byte-compatible
//! with Git.
//!
//! - `areas`: the repository and its storage areas (database, index, refs, workspace)
//! - `artifacts`: object, index and ref data structures with their encodings
//! - `commands`: the operations, as `impl Repository` blocks
//! - `config`: identity and branch configuration
//! - `error`: the crate error type
//! - `logging`: `tracing` subscriber setup for the binary

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use areas::repository::Repository;
pub use commands::porcelain::add::StageReport;
pub use config::Config;
pub use error::{Error, Result};
