use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository holding `1.txt`, `a/2.txt` and `a/b/3.txt`, staged and committed once
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = [
        ("1.txt", "one"),
        ("a/2.txt", "two"),
        ("a/b/3.txt", "three"),
    ];
    for (path, content) in files {
        write_file(FileSpec::new(
            repository_dir.path().join(path),
            content.to_string(),
        ));
    }

    run_cairn_command(repository_dir.path(), &["add", "1.txt", "a/2.txt", "a/b/3.txt"])
        .assert()
        .success();

    cairn_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_cairn_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("cairn").expect("Failed to find cairn binary");
    cmd.env_remove("CAIRN_LOG");
    cmd.env_remove("CAIRN_BRANCH");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn cairn_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_cairn_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd.env_remove("GIT_COMMITTER_NAME");
    cmd.env_remove("GIT_COMMITTER_EMAIL");
    cmd.env_remove("GIT_COMMITTER_DATE");
    cmd
}

/// Get the current HEAD commit SHA by following `HEAD` through one symbolic ref
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".git").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".git").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Print an object through `cairn cat-file -p`
pub fn cat_object(dir: &Path, oid: &str) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_cairn_command(dir, &["cat-file", "-p", oid]).output()?;
    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).into_owned().into());
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// Count the loose objects under `.git/objects`
pub fn object_count(dir: &Path) -> usize {
    std::fs::read_dir(dir.join(".git").join("objects"))
        .map(|buckets| {
            buckets
                .flatten()
                .filter(|bucket| bucket.path().is_dir())
                .map(|bucket| {
                    std::fs::read_dir(bucket.path())
                        .map(|objects| objects.count())
                        .unwrap_or(0)
                })
                .sum()
        })
        .unwrap_or(0)
}
