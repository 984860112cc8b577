//! Authors cassette files one interaction at a time.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Builds a cassette in memory and writes it out on [`finish`](Self::finish).
///
/// Sequence numbers follow call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty cassette named `name`, to be written to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let cassette = Cassette { name: name.into(), recorded_at: Utc::now(), interactions: Vec::new() };
        Self { path: path.into(), cassette }
    }

    /// Appends one `port::method` call with its input and output.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction::new(seq, port, method, input, output));
    }

    /// Writes the cassette and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> std::io::Result<PathBuf> {
        self.cassette.save(&self.path)?;
        Ok(self.path)
    }
}
