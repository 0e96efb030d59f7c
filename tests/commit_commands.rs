use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, cairn_commit, cat_object, get_head_commit_sha, init_repository_dir,
    object_count, repository_dir, run_cairn_command,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

// 2023-01-01 12:00:00 +0000
const AUTHOR_TIMESTAMP: &str = "1672574400 +0000";

fn header_value<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    object
        .lines()
        .take_while(|line| !line.is_empty())
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(' '))
}

#[rstest]
fn root_commit_is_reported_and_recorded(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("hello.txt").write_str("hello world\n")?;
    run_cairn_command(repository_dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    cairn_commit(repository_dir.path(), "Initial commit\n\nWith a body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[master \(root-commit\) [0-9a-f]{7}\] Initial commit\n$",
        )?);

    let head = get_head_commit_sha(repository_dir.path())?;
    repository_dir
        .child(".git/refs/heads/master")
        .assert(format!("{head}\n"));

    let commit = cat_object(repository_dir.path(), &head)?;
    let signature = format!("{AUTHOR_NAME} <{AUTHOR_EMAIL}> {AUTHOR_TIMESTAMP}");
    assert_eq!(header_value(&commit, "author"), Some(signature.as_str()));
    assert_eq!(header_value(&commit, "committer"), Some(signature.as_str()));
    assert_eq!(header_value(&commit, "parent"), None);
    assert!(commit.ends_with("\n\nInitial commit\n\nWith a body\n"));

    // tree holding the single blob, as git writes it
    let tree_oid = header_value(&commit, "tree").ok_or("commit without tree")?;
    assert_eq!(tree_oid, "68aba62e560c0ebc3396e8ae9335232cd93a3f60");
    assert_eq!(
        cat_object(repository_dir.path(), tree_oid)?,
        "100644 blob 3b18e512dba79e4c8300dd08aeb37f8e728b8dad\thello.txt\n"
    );

    Ok(())
}

#[rstest]
fn commit_writes_one_tree_per_directory(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head = get_head_commit_sha(init_repository_dir.path())?;
    let commit = cat_object(init_repository_dir.path(), &head)?;
    let root_oid = header_value(&commit, "tree").ok_or("commit without tree")?;

    let root = cat_object(init_repository_dir.path(), root_oid)?;
    let root_lines = root.lines().collect::<Vec<_>>();
    assert_eq!(root_lines.len(), 2);
    assert!(root_lines[0].starts_with("100644 blob ") && root_lines[0].ends_with("\t1.txt"));
    assert!(root_lines[1].starts_with("040000 tree ") && root_lines[1].ends_with("\ta"));

    let a_oid = root_lines[1]
        .split_whitespace()
        .nth(2)
        .ok_or("tree entry without oid")?;
    let a_tree = cat_object(init_repository_dir.path(), a_oid)?;
    let a_lines = a_tree.lines().collect::<Vec<_>>();
    assert!(a_lines[0].ends_with("\t2.txt"));
    assert!(a_lines[1].starts_with("040000 tree ") && a_lines[1].ends_with("\tb"));

    // three blobs, three trees, one commit
    assert_eq!(object_count(init_repository_dir.path()), 7);

    Ok(())
}

#[rstest]
fn successive_commits_chain_through_the_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = get_head_commit_sha(init_repository_dir.path())?;

    init_repository_dir.child("4.txt").write_str("four")?;
    run_cairn_command(init_repository_dir.path(), &["add", "4.txt"])
        .assert()
        .success();
    cairn_commit(init_repository_dir.path(), "Second commit")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[master "))
        .stdout(predicate::str::contains("root-commit").not())
        .stdout(predicate::str::ends_with("] Second commit\n"));

    let second = get_head_commit_sha(init_repository_dir.path())?;
    assert_ne!(first, second);

    let commit = cat_object(init_repository_dir.path(), &second)?;
    assert_eq!(header_value(&commit, "parent"), Some(first.as_str()));

    Ok(())
}

#[rstest]
fn committing_an_unchanged_index_still_records_a_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = get_head_commit_sha(init_repository_dir.path())?;

    cairn_commit(init_repository_dir.path(), "Same tree")
        .assert()
        .success();

    let second = get_head_commit_sha(init_repository_dir.path())?;
    let first_commit = cat_object(init_repository_dir.path(), &first)?;
    let second_commit = cat_object(init_repository_dir.path(), &second)?;
    assert_eq!(
        header_value(&first_commit, "tree"),
        header_value(&second_commit, "tree")
    );
    assert_eq!(header_value(&second_commit, "parent"), Some(first.as_str()));

    Ok(())
}

#[rstest]
fn committing_an_empty_index_fails_without_writes(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    cairn_commit(repository_dir.path(), "Nothing here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no changes to commit"));

    assert_eq!(object_count(repository_dir.path()), 0);
    repository_dir
        .child(".git/refs/heads/master")
        .assert(predicate::path::missing());

    Ok(())
}

#[rstest]
fn committer_identity_can_differ_from_the_author(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_cairn_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("a.txt").write_str("a")?;
    run_cairn_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    cairn_commit(repository_dir.path(), "Committed by someone else")
        .env("GIT_COMMITTER_NAME", "Grace Hopper")
        .env("GIT_COMMITTER_EMAIL", "grace@example.com")
        .env("GIT_COMMITTER_DATE", "2023-01-02 08:30:00 +0200")
        .assert()
        .success();

    let head = get_head_commit_sha(repository_dir.path())?;
    let commit = cat_object(repository_dir.path(), &head)?;
    assert_eq!(
        header_value(&commit, "author"),
        Some(format!("{AUTHOR_NAME} <{AUTHOR_EMAIL}> {AUTHOR_TIMESTAMP}").as_str())
    );
    assert_eq!(
        header_value(&commit, "committer"),
        Some("Grace Hopper <grace@example.com> 1672641000 +0200")
    );

    Ok(())
}
