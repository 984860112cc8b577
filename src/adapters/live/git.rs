//! Live git adapter using `git` CLI commands.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use chrono::NaiveDate;
use tracing::debug;

use crate::ports::git::{GitRepo, Lifecycle};
use crate::ports::PortError;

/// Live git adapter that shells out to the `git` CLI from a fixed directory.
pub struct LiveGitRepo {
    workdir: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter that runs every git command inside `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    fn git(&self, args: &[&str]) -> Result<Output, PortError> {
        git_in(&self.workdir, args)
    }

    fn git_stdout(&self, args: &[&str]) -> Result<String, PortError> {
        stdout_of(&self.workdir, args)
    }
}

fn git_in(dir: &Path, args: &[&str]) -> Result<Output, PortError> {
    debug!(?args, dir = %dir.display(), "running git");
    Ok(Command::new("git").current_dir(dir).args(args).output()?)
}

fn stdout_of(dir: &Path, args: &[&str]) -> Result<String, PortError> {
    let output = git_in(dir, args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// One `git log --format="%H %as"` line: commit hash and short ISO date.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogEntry {
    hash: String,
    date: NaiveDate,
}

/// Parses `%H %as` lines emitted by `git log`, newest first.
fn parse_log(stdout: &str) -> Vec<LogEntry> {
    stdout
        .lines()
        .filter_map(|line| {
            let (hash, date) = line.trim().split_once(' ')?;
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
            Some(LogEntry { hash: hash.to_string(), date })
        })
        .collect()
}

/// The path is dead in history only if its newest commit is the deletion.
/// A deletion followed by re-creation belongs to an earlier life.
fn committed_deletion(history: &[LogEntry], deletions: &[LogEntry]) -> Option<NaiveDate> {
    match (history.first(), deletions.first()) {
        (Some(last), Some(deletion)) if last.hash == deletion.hash => Some(deletion.date),
        _ => None,
    }
}

/// Returns `true` when `git show rev:path` failed only because the path is
/// absent at that revision (or the revision has no commits yet).
fn is_missing_path(stderr: &str) -> bool {
    stderr.contains("does not exist in")
        || stderr.contains("exists on disk, but not in")
        || stderr.contains("invalid object name")
        || stderr.contains("bad revision")
}

impl GitRepo for LiveGitRepo {
    fn toplevel(&self) -> Result<PathBuf, PortError> {
        let stdout = self.git_stdout(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    fn hooks_dir(&self) -> Result<PathBuf, PortError> {
        let stdout = self.git_stdout(&["rev-parse", "--git-path", "hooks"])?;
        let hooks = Path::new(stdout.trim());
        Ok(if hooks.is_absolute() { hooks.to_path_buf() } else { self.workdir.join(hooks) })
    }

    fn list_staged_deletions(&self) -> Result<BTreeSet<String>, PortError> {
        let stdout = self.git_stdout(&["diff", "--cached", "--diff-filter=D", "--name-only"])?;
        Ok(stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
    }

    fn read_at_revision(&self, path: &str, revision: &str) -> Result<Option<String>, PortError> {
        let spec = format!("{revision}:{path}");
        let output = self.git(&["show", &spec])?;
        if output.status.success() {
            return Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_missing_path(&stderr) {
            return Ok(None);
        }
        Err(format!("git show {spec} failed: {}", stderr.trim()).into())
    }

    fn lifecycle(&self, path: &str) -> Result<Lifecycle, PortError> {
        // Paths are repository-relative; the workdir may be a subdirectory.
        let top = self.toplevel()?;
        let history = parse_log(&stdout_of(&top, &["log", "--follow", "--format=%H %as", "--", path])?);
        let deletions =
            parse_log(&stdout_of(&top, &["log", "--diff-filter=D", "--format=%H %as", "-n1", "--", path])?);
        Ok(Lifecycle {
            born: history.last().map(|entry| entry.date),
            deleted: committed_deletion(&history, &deletions),
        })
    }
}
