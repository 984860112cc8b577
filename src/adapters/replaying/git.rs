//! Replaying adapter for the `GitRepo` port.

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::{next_output, replay_result, SharedReplayer};
use crate::ports::git::{GitRepo, Lifecycle};
use crate::ports::PortError;

/// Replays recorded git queries from a cassette.
pub struct ReplayingGitRepo {
    replayer: SharedReplayer,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a shared replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }

    fn replay<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, PortError> {
        let output = next_output(&self.replayer, "git", method);
        replay_result(output, &format!("git::{method}"))
    }
}

impl GitRepo for ReplayingGitRepo {
    fn toplevel(&self) -> Result<PathBuf, PortError> {
        self.replay("toplevel")
    }

    fn hooks_dir(&self) -> Result<PathBuf, PortError> {
        self.replay("hooks_dir")
    }

    fn list_staged_deletions(&self) -> Result<BTreeSet<String>, PortError> {
        self.replay("list_staged_deletions")
    }

    fn read_at_revision(&self, _path: &str, _revision: &str) -> Result<Option<String>, PortError> {
        self.replay("read_at_revision")
    }

    fn lifecycle(&self, _path: &str) -> Result<Lifecycle, PortError> {
        self.replay("lifecycle")
    }
}
