use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use tracing::debug;

const CONFIG_TEMPLATE: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n";

impl Repository {
    /// Create the `.git` skeleton: objects, refs/heads, refs/tags, config and a HEAD
    /// pointing at the configured branch
    ///
    /// Fails without touching anything when `.git` already exists. No index file is
    /// created; a missing index reads as empty.
    pub fn init(&mut self) -> Result<()> {
        let git_path = self.git_path();
        if git_path.exists() {
            return Err(Error::AlreadyInitialized(git_path.into()));
        }

        let branch = BranchName::try_parse(self.config().branch.as_str())?;

        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.refs().heads_path())?;
        fs::create_dir_all(self.refs().tags_path())?;
        fs::write(git_path.join("config"), CONFIG_TEMPLATE)?;

        self.refs().set_head(&branch)?;

        debug!(path = %git_path.display(), %branch, "repository initialized");

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            git_path.display()
        )?;

        Ok(())
    }
}
