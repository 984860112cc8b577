//! The append-only graveyard log kept at the repository root.

pub mod format;
pub mod render;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ObituaryError;
use crate::obituary::ObituaryRecord;
use crate::ports::filesystem::FileSystem;

pub use format::{format_record, HEADER};
pub use render::{render_pretty, render_table};

/// File name of the log inside the repository root.
pub const GRAVEYARD_FILE: &str = "GRAVEYARD.md";

/// Reads and appends graveyard records through the filesystem port.
///
/// Existing blocks are never rewritten; the only mutation is an append.
pub struct Graveyard<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> Graveyard<'a> {
    /// Opens the log for the repository rooted at `repo_root`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, repo_root: &Path) -> Self {
        Self { fs, path: repo_root.join(GRAVEYARD_FILE) }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the log with its header if absent.
    /// Returns the block as written.
    ///
    /// # Errors
    ///
    /// Returns [`ObituaryError::Io`] if the log cannot be read or written.
    pub fn append(&self, record: &ObituaryRecord) -> Result<String, ObituaryError> {
        let entry = format_record(record);
        let prefix = if self.fs.exists(&self.path) {
            let existing =
                self.fs.read_to_string(&self.path).map_err(|e| ObituaryError::io(&self.path, e))?;
            format::continuation(&existing)
        } else {
            debug!(path = %self.path.display(), "creating graveyard log");
            HEADER.to_string()
        };

        self.fs
            .append(&self.path, &format!("{prefix}{entry}"))
            .map_err(|e| ObituaryError::io(&self.path, e))?;
        debug!(path = %record.path, "appended obituary");
        Ok(entry)
    }

    /// Parses every record in file order. A missing log reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ObituaryError::LogParse`] if the log exists but its
    /// structure is unrecognizable, or [`ObituaryError::Io`] if it cannot
    /// be read.
    pub fn read_all(&self) -> Result<Vec<ObituaryRecord>, ObituaryError> {
        if !self.fs.exists(&self.path) {
            return Ok(Vec::new());
        }
        let text =
            self.fs.read_to_string(&self.path).map_err(|e| ObituaryError::io(&self.path, e))?;
        format::parse(&text, &self.path)
    }
}
