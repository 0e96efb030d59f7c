use crate::areas::repository::Repository;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of staging a batch of paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Index paths that were staged, in input order
    pub staged: Vec<String>,
    /// Input paths skipped because the file does not exist
    pub skipped: Vec<PathBuf>,
}

impl Repository {
    /// Stage each path: store its blob and record it in the index
    ///
    /// Paths are absolute or relative to the repository root. A missing file is
    /// logged and reported in [`StageReport::skipped`] while the rest of the batch is
    /// staged; any other failure aborts before the index is written.
    pub fn add<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<StageReport> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        let mut report = StageReport::default();

        for path in paths {
            let path = path.as_ref();
            let relative_path = self.workspace().relative_path(path)?;

            match index.add_file(self.workspace(), self.database(), &relative_path) {
                Ok(oid) => {
                    debug!(path = %relative_path, %oid, "staged");
                    report.staged.push(relative_path);
                }
                Err(error) if error.is_missing_file() => {
                    warn!("could not stage '{}': file not found", path.display());
                    report.skipped.push(path.to_path_buf());
                }
                Err(error) => return Err(error),
            }
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(report)
    }
}
