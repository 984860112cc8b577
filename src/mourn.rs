//! The mourning pipeline: recover content, date it, compose, append.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::context::ServiceContext;
use crate::error::ObituaryError;
use crate::graveyard::{Graveyard, GRAVEYARD_FILE};
use crate::obituary::extract::find_survivors;
use crate::obituary::{compose, extract, ComposeInput, ComposeMode, ObituaryRecord, DEFAULT_CAUSE};
use crate::ports::git::Lifecycle;

/// One file to mourn.
#[derive(Debug, Clone)]
pub struct MournRequest {
    /// Absolute path, or a path relative to the repository root.
    pub path: PathBuf,
    /// Cause of death; blank counts as none.
    pub reason: Option<String>,
    /// Prefer the `HEAD` revision over the working tree.
    pub from_git: bool,
}

/// Result of a successful mourning.
#[derive(Debug, Clone)]
pub struct Mourned {
    /// The record appended to the log.
    pub record: ObituaryRecord,
    /// The block as written.
    pub entry: String,
    /// How the narrative was produced.
    pub mode: ComposeMode,
}

/// Outcome of mourning every staged deletion.
#[derive(Debug, Default)]
pub struct StagedReport {
    /// Files whose obituary was appended.
    pub mourned: Vec<Mourned>,
    /// Files that could not be mourned, with the reason.
    pub failures: Vec<(String, ObituaryError)>,
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Path as recorded in the log: relative to `repo_root` when inside it,
/// always `/`-separated.
#[must_use]
pub fn display_path(repo_root: &Path, path: &Path) -> String {
    let path = normalize(path);
    match path.strip_prefix(normalize(repo_root)) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// Writes an obituary for one file and appends it to the graveyard.
///
/// # Errors
///
/// Returns [`ObituaryError::Input`] if the content is neither on disk nor
/// in `HEAD`, or [`ObituaryError::Io`] / [`ObituaryError::LogParse`] if
/// the log cannot be appended to.
pub async fn mourn(
    ctx: &ServiceContext,
    repo_root: &Path,
    request: &MournRequest,
) -> Result<Mourned, ObituaryError> {
    mourn_one(ctx, repo_root, request, false).await
}

/// With `staged`, the deletion is still in the index, so any deletion date
/// in history belongs to an earlier life of the path and death is today.
async fn mourn_one(
    ctx: &ServiceContext,
    repo_root: &Path,
    request: &MournRequest,
    staged: bool,
) -> Result<Mourned, ObituaryError> {
    let absolute = normalize(&repo_root.join(&request.path));
    let rel_path = display_path(repo_root, &absolute);
    let content = recover_content(ctx, &absolute, &rel_path, request.from_git)?;

    let lifecycle = ctx.git.lifecycle(&rel_path).unwrap_or_else(|e| {
        warn!(path = %rel_path, error = %e, "cannot read history, dates unknown");
        Lifecycle::default()
    });
    let committed = if staged { None } else { lifecycle.deleted };
    let died = committed.unwrap_or_else(|| ctx.clock.today());
    let born = lifecycle.born.filter(|born| {
        if *born > died {
            warn!(path = %rel_path, %born, %died, "birth date after death date, discarding it");
            false
        } else {
            true
        }
    });

    let reason = request.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let extraction = extract(&content, &rel_path);
    debug!(path = %rel_path, symbols = extraction.symbols.len(), lines = extraction.line_count, "extracted");

    let input = ComposeInput {
        path: &rel_path,
        content: &content,
        extraction: &extraction,
        reason,
        born,
        died: Some(died),
    };
    let composition = compose(ctx.llm.as_deref(), &ctx.config.model, &input).await;
    let survivors = find_survivors(&rel_path, &[reason.unwrap_or_default(), composition.narrative.as_str()]);

    let record = ObituaryRecord {
        path: rel_path,
        born,
        died: Some(died),
        cause: reason.unwrap_or(DEFAULT_CAUSE).to_string(),
        last_words: composition.last_words,
        narrative: composition.narrative,
        survivors,
    };
    let entry = Graveyard::new(ctx.fs.as_ref(), repo_root).append(&record)?;
    info!(path = %record.path, "obituary written");

    Ok(Mourned { record, entry, mode: composition.mode })
}

/// Mourns every deletion staged in the index, reading content from `HEAD`.
///
/// A failure on one file does not stop the others. Staged deletions are
/// not committed yet, so each dies today.
///
/// # Errors
///
/// Returns [`ObituaryError::Git`] if the staged deletions cannot be listed.
pub async fn mourn_staged(ctx: &ServiceContext, repo_root: &Path) -> Result<StagedReport, ObituaryError> {
    let staged = ctx.git.list_staged_deletions().map_err(|e| ObituaryError::Git(e.to_string()))?;
    let mut report = StagedReport::default();

    for path in staged {
        if path == GRAVEYARD_FILE {
            continue;
        }
        let request = MournRequest { path: PathBuf::from(&path), reason: None, from_git: true };
        match mourn_one(ctx, repo_root, &request, true).await {
            Ok(mourned) => report.mourned.push(mourned),
            Err(e) => {
                warn!(path = %path, error = %e, "cannot mourn staged deletion");
                report.failures.push((path, e));
            }
        }
    }
    Ok(report)
}

fn recover_content(
    ctx: &ServiceContext,
    absolute: &Path,
    rel_path: &str,
    from_git: bool,
) -> Result<String, ObituaryError> {
    let from_disk = || match ctx.fs.read_lossy(absolute) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!(path = %absolute.display(), error = %e, "not readable on disk");
            None
        }
    };
    let from_head = || match ctx.git.read_at_revision(rel_path, "HEAD") {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %rel_path, error = %e, "cannot read HEAD revision");
            None
        }
    };

    let content = if from_git { from_head().or_else(from_disk) } else { from_disk().or_else(from_head) };
    content.ok_or_else(|| ObituaryError::Input { path: rel_path.to_string() })
}
