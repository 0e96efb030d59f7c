use crate::areas::repository::Repository;
use crate::error::Result;
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Remove paths from the index, leaving the working files alone (`rm --cached`)
    ///
    /// A directory path removes everything staged below it. Paths that are not staged
    /// are ignored.
    ///
    /// # Returns
    ///
    /// The index paths that were removed
    pub fn unstage<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<String>> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        let mut removed = Vec::new();
        for path in paths {
            let relative_path = self.workspace().relative_path(path.as_ref())?;

            if index.remove(&relative_path) {
                debug!(path = %relative_path, "unstaged");
                removed.push(relative_path);
            }
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(removed)
    }
}
