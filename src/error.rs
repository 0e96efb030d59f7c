//! Error types for the object store, the index and the refs.
//!
//! Every failure the core can report is one variant of [`Error`], so callers can
//! tell the recoverable cases (a missing file during `add`) apart from the fatal ones.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("not a repository (or any parent up to the filesystem root): {0}")]
    NotARepository(PathBuf),

    #[error("no changes to commit")]
    NothingToCommit,

    #[error("path {0} is outside the repository")]
    PathOutsideRepository(PathBuf),

    #[error("path {0} is not valid UTF-8")]
    InvalidPath(PathBuf),

    #[error("file not found: {0}")]
    MissingFile(PathBuf),

    #[error("invalid index format: {0}")]
    InvalidIndex(String),

    #[error("invalid object: {0}")]
    InvalidObject(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid reference {name}: {reason}")]
    InvalidRef { name: String, reason: String },

    #[error("unable to create {0}: file is locked by another process")]
    Locked(PathBuf),

    #[error("compression failed: {0}")]
    Compression(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error may be downgraded to a warning while staging a batch of files.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Error::MissingFile(_))
    }

    pub(crate) fn invalid_index(reason: impl Into<String>) -> Self {
        Error::InvalidIndex(reason.into())
    }

    pub(crate) fn invalid_object(reason: impl Into<String>) -> Self {
        Error::InvalidObject(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
