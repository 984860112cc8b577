//! Command dispatch and handlers.

pub mod install;
pub mod list;
pub mod mourn;
pub mod mourn_staged;
pub mod view;

use std::env;
use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::{Command, RepoArgs};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// Configuration is read from the environment; when `OBITUARY_REPLAY`
/// names a cassette, the clock, git and llm ports replay it.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let cwd = env::current_dir().map_err(|e| format!("cannot determine current directory: {e}"))?;
    let workdir = command.repo().repo_root.as_ref().map_or_else(|| cwd.clone(), |root| cwd.join(root));
    let ctx = ServiceContext::from_config(Config::from_env(), &workdir)?;
    dispatch_with_context(command, &ctx, &cwd)
}

/// Dispatch a command with the given service context. Relative paths on
/// the command line resolve against `cwd`.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext, cwd: &Path) -> Result<(), String> {
    match command {
        Command::Mourn { path, reason, from_git, repo } => {
            let root = repo_root(ctx, cwd, repo);
            mourn::run(ctx, &root, &cwd.join(path), reason.as_deref(), *from_git)
        }
        Command::MournStaged { repo } => mourn_staged::run(ctx, &repo_root(ctx, cwd, repo)),
        Command::Install { repo } => {
            if repo.repo_root.is_none() {
                ctx.git.toplevel().map_err(|e| format!("not inside a git repository: {e}"))?;
            }
            install::run(ctx)
        }
        Command::View { repo } => view::run(ctx, &repo_root(ctx, cwd, repo)),
        Command::List { repo } => list::run(ctx, &repo_root(ctx, cwd, repo)),
    }
}

/// Resolves the repository root: the explicit flag, else the enclosing git
/// repository, else `cwd`.
fn repo_root(ctx: &ServiceContext, cwd: &Path, repo: &RepoArgs) -> PathBuf {
    if let Some(root) = &repo.repo_root {
        return cwd.join(root);
    }
    match ctx.git.toplevel() {
        Ok(root) => root,
        Err(e) => {
            debug!(error = %e, "no enclosing git repository, using current directory");
            cwd.to_path_buf()
        }
    }
}

/// Drives `future` to completion on a single-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}
