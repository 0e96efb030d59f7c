//! Lock files for atomic replacement of the index and refs
//!
//! A `<file>.lock` sibling is created exclusively, written under an advisory
//! `file_guard` lock and renamed over the target. If the lock file already exists
//! another writer is active and the update fails with [`Error::Locked`].
//! A lock that is dropped without being committed is removed.

use crate::error::{Error, Result};
use file_guard::Lock;
use std::fs::File;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Lockfile {
    target_path: PathBuf,
    lock_path: PathBuf,
    file: File,
    committed: bool,
}

impl Lockfile {
    pub fn acquire(target_path: &Path) -> Result<Self> {
        let mut lock_name = target_path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| Error::Locked(target_path.to_path_buf()))?;
        lock_name.push(".lock");
        let lock_path = target_path.with_file_name(lock_name);

        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::AlreadyExists => Error::Locked(lock_path.clone()),
                _ => Error::Io(error),
            })?;

        Ok(Lockfile {
            target_path: target_path.to_path_buf(),
            lock_path,
            file,
            committed: false,
        })
    }

    /// Write `content` and rename the lock file over the target
    pub fn commit(mut self, content: &[u8]) -> Result<()> {
        {
            let mut guard = file_guard::lock(&mut self.file, Lock::Exclusive, 0, 1)?;
            guard.deref_mut().write_all(content)?;
            guard.deref_mut().sync_all()?;
        }

        std::fs::rename(&self.lock_path, &self.target_path)?;
        self.committed = true;

        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn commit_replaces_the_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("HEAD");
        std::fs::write(&target, "old").unwrap();

        Lockfile::acquire(&target).unwrap().commit(b"new").unwrap();

        pretty_assertions::assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!temp_dir.path().join("HEAD.lock").exists());
    }

    #[test]
    fn second_writer_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("index");

        let _held = Lockfile::acquire(&target).unwrap();

        assert!(matches!(Lockfile::acquire(&target), Err(Error::Locked(_))));
    }

    #[test]
    fn abandoned_lock_is_cleaned_up() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("index");

        drop(Lockfile::acquire(&target).unwrap());

        assert!(!temp_dir.path().join("index.lock").exists());
        assert!(!target.exists());
    }
}
