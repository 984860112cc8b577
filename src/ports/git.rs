//! Git repository port: the deletion detector boundary.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PortError;

/// Commit-history dates for a single path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Date of the oldest commit touching the path (following renames).
    pub born: Option<NaiveDate>,
    /// Date of the most recent commit that deleted the path, if committed.
    pub deleted: Option<NaiveDate>,
}

/// Read access to the host git repository.
///
/// Only the handful of queries the mourning pipeline consumes are modeled.
pub trait GitRepo: Send + Sync {
    /// Returns the absolute path of the repository's working tree root.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is not inside a repository.
    fn toplevel(&self) -> Result<PathBuf, PortError>;

    /// Returns the directory git reads hooks from.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is not inside a repository.
    fn hooks_dir(&self) -> Result<PathBuf, PortError>;

    /// Lists repository-relative paths staged for deletion in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be diffed.
    fn list_staged_deletions(&self) -> Result<BTreeSet<String>, PortError>;

    /// Returns the content of `path` as of `revision`, or `None` when the
    /// path did not exist at that revision.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than a missing path.
    fn read_at_revision(&self, path: &str, revision: &str) -> Result<Option<String>, PortError>;

    /// Returns the birth and deletion dates recorded in history for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    fn lifecycle(&self, path: &str) -> Result<Lifecycle, PortError>;
}
