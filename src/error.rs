//! Error types for the mourning pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a command.
///
/// A failed generative call is deliberately absent: it degrades to the
/// template composer (see [`crate::obituary::ComposeMode::Fallback`]).
#[derive(Error, Debug)]
pub enum ObituaryError {
    /// The file is gone from disk and no prior revision holds it.
    #[error("cannot mourn {path}: not readable on disk and no prior revision available")]
    Input {
        /// Path as supplied by the caller.
        path: String,
    },

    /// The graveyard log exists but its structure is unrecognizable.
    #[error("{}:{line}: unrecognized graveyard log: {reason}", path.display())]
    LogParse {
        /// Log file that failed to parse.
        path: PathBuf,
        /// 1-based line number where parsing gave up.
        line: usize,
        /// What was expected.
        reason: String,
    },

    /// The hook target could not be located or written.
    #[error("cannot install hook: {0}")]
    HookInstall(String),

    /// A git query failed outright.
    #[error("git error: {0}")]
    Git(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {message}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
}

impl ObituaryError {
    /// Wraps a port error raised while accessing `path`.
    pub(crate) fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Io { path: path.into(), message: err.to_string() }
    }
}
