//! References (HEAD and branches)
//!
//! References are human-readable names pointing to commits. They are either:
//! - Direct: a file holding a 40-character hex object id
//! - Symbolic: a file holding `ref: <path>` (HEAD -> refs/heads/master)
//!
//! Every write goes through a `<ref>.lock` file that is renamed into place.

use crate::areas::lockfile::Lockfile;
use crate::artifacts::branch::SYMREF_REGEX;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use derive_new::new;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic refs are followed at most this many times
const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// Parsed content of a ref file
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(name: &str, path: &Path) -> Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let invalid = |reason: String| Error::InvalidRef {
            name: name.to_string(),
            reason,
        };

        let symref_match = regex::Regex::new(SYMREF_REGEX)
            .map_err(|error| invalid(error.to_string()))?
            .captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef(symref_match[1].to_string())))
        } else {
            ObjectId::try_parse(content)
                .map(|oid| Some(SymRefOrOid::Oid(oid)))
                .map_err(|error| invalid(error.to_string()))
        }
    }
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn tags_path(&self) -> PathBuf {
        self.refs_path().join("tags")
    }

    /// Resolve HEAD to a commit id, `None` while the branch has no commits
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        self.read_ref(HEAD_REF_NAME)
    }

    /// Resolve a ref by name, following symbolic refs
    pub fn read_ref(&self, name: &str) -> Result<Option<ObjectId>> {
        let (_, target) = self.resolve(name)?;

        Ok(target)
    }

    /// The ref HEAD ultimately points at, e.g. `refs/heads/master`
    ///
    /// A detached HEAD resolves to `HEAD` itself.
    pub fn current_ref(&self) -> Result<String> {
        let (name, _) = self.resolve(HEAD_REF_NAME)?;

        Ok(name)
    }

    /// Point HEAD at `branch`
    pub fn set_head(&self, branch: &BranchName) -> Result<()> {
        self.update_ref_file(
            &self.head_path(),
            format!("ref: {}\n", branch.to_ref_name()),
        )
    }

    pub fn update_branch(&self, branch: &BranchName, oid: &ObjectId) -> Result<()> {
        self.update_ref_file(&self.heads_path().join(branch.as_ref()), format!("{oid}\n"))?;

        debug!(reference = %branch.to_ref_name(), %oid, "ref updated");

        Ok(())
    }

    fn update_ref_file(&self, path: &Path, content: String) -> Result<()> {
        Lockfile::acquire(path)?.commit(content.as_bytes())
    }

    /// Follow `name` through symbolic refs to the last ref in the chain
    fn resolve(&self, name: &str) -> Result<(String, Option<ObjectId>)> {
        let mut current = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&current, &self.path.join(&current))? {
                Some(SymRefOrOid::SymRef(target)) => current = target,
                Some(SymRefOrOid::Oid(oid)) => return Ok((current, Some(oid))),
                None => return Ok((current, None)),
            }
        }

        Err(Error::InvalidRef {
            name: name.to_string(),
            reason: format!("more than {MAX_SYMREF_DEPTH} levels of symbolic refs"),
        })
    }
}
