use anyhow::{Context, Result};
use cairn::areas::repository::{GIT_DIR, Repository};
use cairn::logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "cairn",
    version = "0.1.0",
    about = "A minimal Git-compatible object store",
    long_about = "cairn stages files into a Git index, snapshots them as tree objects \
    and records commits on a single branch. Objects are byte-compatible with Git.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stores the content of each file as a blob and records it in the index. \
        Missing files are reported and skipped."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit from the index with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Remove files from the index",
        long_about = "This command removes paths from the index. Only --cached is supported: \
        the working files are left untouched."
    )]
    Rm {
        #[arg(long, required = true, help = "Only remove from the index")]
        cached: bool,
        #[arg(index = 1, required = true, help = "The paths to unstage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command computes the blob id of a file and can write it to the object database."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let pwd = std::env::current_dir()
        .and_then(|pwd| pwd.canonicalize())
        .context("Unable to resolve the current directory")?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.map_or_else(|| pwd.clone(), |path| pwd.join(path));
            let mut repository = open(&path)?;

            repository.init()?;
        }
        Commands::Add { paths } => {
            let mut repository = open(&find_root(&pwd)?)?;
            let paths = absolute(&pwd, paths);

            repository.add(&paths)?;
        }
        Commands::Commit { message } => {
            let mut repository = open(&find_root(&pwd)?)?;

            repository.commit(&message)?;
        }
        Commands::Rm { cached: _, paths } => {
            let mut repository = open(&find_root(&pwd)?)?;
            let paths = absolute(&pwd, paths);

            repository.unstage(&paths)?;
        }
        Commands::CatFile { sha } => {
            let mut repository = open(&find_root(&pwd)?)?;

            repository.cat_file(&sha)?;
        }
        Commands::HashObject { write, file } => {
            let root = find_root(&pwd).unwrap_or_else(|_| pwd.clone());
            let mut repository = open(&root)?;

            repository.hash_object(&pwd.join(file), write)?;
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<Repository> {
    Repository::new(path, Box::new(std::io::stdout()))
        .with_context(|| format!("Unable to open repository at {}", path.display()))
}

/// Closest ancestor of `pwd` holding a `.git` directory
fn find_root(pwd: &Path) -> cairn::Result<PathBuf> {
    pwd.ancestors()
        .find(|dir| dir.join(GIT_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| cairn::Error::NotARepository(pwd.to_path_buf()))
}

fn absolute(pwd: &Path, paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.into_iter().map(|path| pwd.join(path)).collect()
}
