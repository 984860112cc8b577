//! Filesystem port for file I/O operations.

use std::path::Path;

use super::PortError;

/// Provides filesystem access for the graveyard log and mourned files.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Reads a file, replacing invalid UTF-8 sequences with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_lossy(&self, path: &Path) -> Result<String, PortError>;

    /// Appends `contents` to the end of a file in a single write, creating
    /// the file if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    fn append(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}
