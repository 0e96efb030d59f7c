//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area (index) for the next commit
//! - `lockfile`: Atomic replacement of the index and ref files
//! - `refs`: Reference management (HEAD and branches)
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub(crate) mod lockfile;
pub mod refs;
pub mod repository;
pub mod workspace;
