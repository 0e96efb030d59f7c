use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{repository_dir, run_cairn_command};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn init_repository_at_path_successfully(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.child("project");
    let git_dir = repository_dir
        .path()
        .canonicalize()?
        .join("project")
        .join(".git")
        .display()
        .to_string();

    run_cairn_command(repository_dir.path(), &["init", "project"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^Initialized empty repository in .+\n$")?)
        .stdout(predicate::str::contains(git_dir));

    target.child(".git/objects").assert(predicate::path::is_dir());
    target.child(".git/refs/heads").assert(predicate::path::is_dir());
    target.child(".git/refs/tags").assert(predicate::path::is_dir());
    target.child(".git/HEAD").assert("ref: refs/heads/master\n");
    target.child(".git/config").assert(predicate::path::is_file());
    target.child(".git/index").assert(predicate::path::missing());

    Ok(())
}

#[rstest]
fn init_repository_in_current_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty repository in"));

    repository_dir
        .child(".git/HEAD")
        .assert("ref: refs/heads/master\n");

    Ok(())
}

#[rstest]
fn init_honours_the_configured_branch(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .env("CAIRN_BRANCH", "trunk")
        .assert()
        .success();

    repository_dir
        .child(".git/HEAD")
        .assert("ref: refs/heads/trunk\n");

    Ok(())
}

#[rstest]
fn init_twice_is_refused(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    Ok(())
}

#[rstest]
fn init_rejects_an_invalid_branch_name(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .env("CAIRN_BRANCH", "bad..name")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reference"));

    repository_dir
        .child(".git")
        .assert(predicate::path::missing());

    Ok(())
}
