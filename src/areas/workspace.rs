//! Working directory access
//!
//! Paths handed to the workspace are slash-separated and relative to the repository
//! root. [`Workspace::relative_path`] turns user input into that form.

use crate::areas::repository::GIT_DIR;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize `path` (absolute, or relative to the root) into an index path
    ///
    /// `..` is resolved lexically. Paths that escape the root, point into `.git` or
    /// name the root itself are rejected.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let outside = || Error::PathOutsideRepository(path.to_path_buf());

        let relative = if path.is_absolute() {
            path.strip_prefix(&self.path).map_err(|_| outside())?
        } else {
            path
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    segments.pop().ok_or_else(outside)?;
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }

        match segments.first() {
            None => Err(outside()),
            Some(&GIT_DIR) => Err(outside()),
            Some(_) => Ok(segments.join("/")),
        }
    }

    pub fn read_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(file_path);

        std::fs::read(&full_path).map_err(|error| Self::missing_or_io(error, full_path))
    }

    pub fn stat_file(&self, file_path: &str) -> Result<EntryMetadata> {
        let full_path = self.full_path(file_path);

        let metadata = std::fs::metadata(&full_path)
            .map_err(|error| Self::missing_or_io(error, full_path))?;

        Ok(EntryMetadata::from(&metadata))
    }

    fn full_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    fn missing_or_io(error: std::io::Error, path: PathBuf) -> Error {
        match error.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                Error::MissingFile(path)
            }
            _ => Error::Io(error),
        }
    }
}
