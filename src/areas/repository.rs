use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::config::Config;
use crate::error::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the directory holding the repository data
pub const GIT_DIR: &str = ".git";

/// A repository rooted at an explicit directory
///
/// Every area is derived from the root given to [`Repository::new`], nothing reads the
/// process working directory.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: Config,
}

impl Repository {
    /// Open the repository at `path`, creating the directory if needed
    ///
    /// Command output goes to `writer`. The configuration is read from the
    /// environment, see [`Config::from_env`].
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let git_path = path.join(GIT_DIR);

        let index = Index::new(git_path.join("index").into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            config: Config::from_env(),
        })
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(GIT_DIR).into_boxed_path()
    }

    /// Fail with [`Error::NotARepository`] unless `init` has laid out `.git`
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.refs.head_path().is_file() {
            Ok(())
        } else {
            Err(Error::NotARepository(self.path.to_path_buf()))
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
