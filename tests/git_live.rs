//! End-to-end runs against a real scratch git repository.
//!
//! Skipped when no `git` executable is available.

use std::path::Path;
use std::process::Command;

use chrono::NaiveDate;

use code_obituary::adapters::live::LiveGitRepo;
use code_obituary::ports::git::GitRepo;

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
}

fn git_command(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command
        .args(["-c", "user.name=Mourner", "-c", "user.email=mourner@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .current_dir(dir);
    command
}

fn git(dir: &Path, args: &[&str]) {
    let status = git_command(dir, args).status().unwrap();
    assert!(status.success(), "git {args:?} failed");
}

/// Commits whatever is staged with both author and committer dated `date`.
fn commit_on(dir: &Path, date: &str, message: &str) {
    let stamp = format!("{date}T12:00:00Z");
    let status = git_command(dir, &["commit", "-q", "-m", message])
        .env("GIT_AUTHOR_DATE", &stamp)
        .env("GIT_COMMITTER_DATE", &stamp)
        .status()
        .unwrap();
    assert!(status.success(), "commit {message:?} failed");
}

/// Creates a repository with `legacy_oauth.py` committed, then staged for
/// deletion.
fn repo_with_staged_deletion() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    std::fs::write(
        dir.path().join("legacy_oauth.py"),
        "def get_oauth_token(consumer_key, consumer_secret):\n    pass\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("keep.rs"), "fn main() {}\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "initial"]);
    git(dir.path(), &["rm", "-q", "legacy_oauth.py"]);
    dir
}

#[test]
fn live_adapter_sees_staged_deletion() {
    if !git_available() {
        return;
    }
    let dir = repo_with_staged_deletion();
    let repo = LiveGitRepo::new(dir.path());

    let staged = repo.list_staged_deletions().unwrap();
    assert_eq!(staged.into_iter().collect::<Vec<_>>(), ["legacy_oauth.py"]);

    let head = repo.read_at_revision("legacy_oauth.py", "HEAD").unwrap().unwrap();
    assert!(head.starts_with("def get_oauth_token"));
    assert_eq!(repo.read_at_revision("never_existed.py", "HEAD").unwrap(), None);

    let lifecycle = repo.lifecycle("legacy_oauth.py").unwrap();
    assert!(lifecycle.born.is_some());
    assert_eq!(lifecycle.deleted, None);
}

#[test]
fn lifecycle_reports_committed_deletion() {
    if !git_available() {
        return;
    }
    let dir = repo_with_staged_deletion();
    git(dir.path(), &["commit", "-q", "-m", "remove oauth"]);

    let lifecycle = LiveGitRepo::new(dir.path()).lifecycle("legacy_oauth.py").unwrap();
    assert!(lifecycle.born.is_some());
    assert!(lifecycle.deleted.is_some());
    assert!(lifecycle.born <= lifecycle.deleted);
}

#[test]
fn recreated_file_is_not_dated_by_its_earlier_deletion() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    std::fs::write(dir.path().join("a.py"), "def first_life():\n    pass\n").unwrap();
    git(dir.path(), &["add", "a.py"]);
    commit_on(dir.path(), "2020-01-01", "born");
    git(dir.path(), &["rm", "-q", "a.py"]);
    commit_on(dir.path(), "2021-01-01", "first death");
    std::fs::write(dir.path().join("a.py"), "def second_life():\n    pass\n").unwrap();
    git(dir.path(), &["add", "a.py"]);
    commit_on(dir.path(), "2022-01-01", "reborn");
    git(dir.path(), &["rm", "-q", "a.py"]);

    let lifecycle = LiveGitRepo::new(dir.path()).lifecycle("a.py").unwrap();
    assert!(lifecycle.born.is_some());
    assert!(lifecycle.born <= NaiveDate::from_ymd_opt(2022, 1, 1));
    assert_eq!(lifecycle.deleted, None);

    let output = Command::new(env!("CARGO_BIN_EXE_code-obituary"))
        .arg("mourn-staged")
        .current_dir(dir.path())
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("OBITUARY_REPLAY")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let log = std::fs::read_to_string(dir.path().join("GRAVEYARD.md")).unwrap();
    assert!(log.contains("**Last words:** \"def second_life():\"\n"));
    assert!(!log.contains("— 2021-01-01"));
    assert!(!log.contains("— 2022-01-01"));
}

#[test]
fn mourn_staged_and_install_in_real_repository() {
    if !git_available() {
        return;
    }
    let dir = repo_with_staged_deletion();
    let bin = env!("CARGO_BIN_EXE_code-obituary");

    let output = Command::new(bin)
        .arg("mourn-staged")
        .current_dir(dir.path())
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("OBITUARY_REPLAY")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let log = std::fs::read_to_string(dir.path().join("GRAVEYARD.md")).unwrap();
    assert!(log.contains("## legacy_oauth.py\n"));
    assert!(log.contains("**Last words:** \"def get_oauth_token(consumer_key, consumer_secret):\"\n"));
    assert!(!log.contains("**Lived:** unknown"));

    let output = Command::new(bin).arg("install").current_dir(dir.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let hook = std::fs::read_to_string(dir.path().join(".git/hooks/pre-commit")).unwrap();
    assert!(hook.contains("code-obituary mourn-staged"));
}
