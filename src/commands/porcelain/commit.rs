use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, REF_PREFIX};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use std::io::Write;
use tracing::debug;

impl Repository {
    /// Snapshot the index as a commit on the current branch
    ///
    /// Trees are stored bottom-up, then the commit, then the branch ref is moved. An
    /// empty index fails with [`Error::NothingToCommit`] before anything is written.
    ///
    /// # Returns
    ///
    /// The id of the new commit
    pub fn commit(&mut self, message: &str) -> Result<ObjectId> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        if index.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let branch = self.current_branch()?;
        let parent = self.refs().read_ref(&branch.to_ref_name())?;
        if let Some(parent) = &parent
            && !self.database().exists(parent)
        {
            return Err(Error::InvalidRef {
                name: branch.to_ref_name(),
                reason: format!("points at missing object {parent}"),
            });
        }

        let entries = index.entries().collect::<Vec<_>>();
        let tree_oid = Tree::build(&entries, &mut |tree: &Tree| self.database().store(tree))?;

        let now = chrono::Local::now().fixed_offset();
        let commit = Commit::new(
            parent,
            tree_oid,
            self.config().author.to_author(now),
            self.config().committer.to_author(now),
            message.to_string(),
        );
        let commit_oid = self.database().store(&commit)?;

        self.refs().update_branch(&branch, &commit_oid)?;
        if self.refs().current_ref()? != branch.to_ref_name() {
            self.refs().set_head(&branch)?;
        }

        debug!(oid = %commit_oid, tree = %tree_oid, %branch, "commit created");

        let root_marker = if parent.is_none() { " (root-commit)" } else { "" };
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            branch,
            root_marker,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }

    /// The branch HEAD points at, or the configured branch when HEAD is missing or
    /// detached
    fn current_branch(&self) -> Result<BranchName> {
        let current_ref = self.refs().current_ref()?;

        match current_ref.strip_prefix(REF_PREFIX) {
            Some(name) => BranchName::try_parse(name),
            None => BranchName::try_parse(self.config().branch.as_str()),
        }
    }
}
