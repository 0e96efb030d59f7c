use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Print the blob id of a file, storing the blob when `write` is set
    ///
    /// Relative paths are taken from the repository root; the file does not have to
    /// live inside the repository. Hashing alone works without an initialized
    /// repository, writing does not.
    pub fn hash_object(&mut self, object_path: &Path, write: bool) -> Result<ObjectId> {
        let full_path = self.path().join(object_path);
        let data = std::fs::read(&full_path).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                Error::MissingFile(full_path.clone())
            }
            _ => Error::Io(error),
        })?;

        let blob = Blob::new(Bytes::from(data));
        let object_id = if write {
            self.ensure_initialized()?;
            self.database().store(&blob)?
        } else {
            blob.object_id()?
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::repository::Repository;
    use crate::config::Config;
    use crate::error::Error;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn hashes_like_git(#[case] write: bool) {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("hello.txt").write_str("hello world\n").unwrap();
        let mut repository = Repository::new(temp_dir.path(), Box::new(std::io::sink()))
            .unwrap()
            .with_config(Config::default());
        repository.init().unwrap();

        let oid = repository.hash_object(Path::new("hello.txt"), write).unwrap();

        pretty_assertions::assert_eq!(oid.to_string(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        pretty_assertions::assert_eq!(repository.database().exists(&oid), write);
    }

    #[test]
    fn missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut repository = Repository::new(temp_dir.path(), Box::new(std::io::sink())).unwrap();

        assert!(matches!(
            repository.hash_object(Path::new("nope"), false),
            Err(Error::MissingFile(_))
        ));
    }

    #[test]
    fn writing_requires_an_initialized_repository() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("hello.txt").write_str("hello world\n").unwrap();
        let mut repository = Repository::new(temp_dir.path(), Box::new(std::io::sink())).unwrap();

        assert!(repository.hash_object(Path::new("hello.txt"), false).is_ok());
        assert!(matches!(
            repository.hash_object(Path::new("hello.txt"), true),
            Err(Error::NotARepository(_))
        ));
        temp_dir.child(".git").assert(predicates::path::missing());
    }
}
