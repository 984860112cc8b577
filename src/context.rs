//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveGitRepo, LiveLlmClient};
use crate::adapters::replaying::{ReplayingClock, ReplayingGitRepo, ReplayingLlmClient};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;
use crate::ports::llm::LlmClient;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up live or replaying adapters.
pub struct ServiceContext {
    /// Clock for obtaining the current date.
    pub clock: Box<dyn Clock>,
    /// Filesystem for the graveyard log and mourned files.
    pub fs: Box<dyn FileSystem>,
    /// Git repository for deletion detection and history.
    pub git: Box<dyn GitRepo>,
    /// Text-generation client; `None` selects the template composer.
    pub llm: Option<Box<dyn LlmClient>>,
    /// Configuration the context was built from.
    pub config: Config,
}

impl ServiceContext {
    /// Builds the context for one CLI invocation, honoring
    /// [`Config::replay`] when set.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be loaded.
    pub fn from_config(config: Config, workdir: &Path) -> Result<Self, String> {
        match config.replay.clone() {
            Some(cassette) => Self::replaying(config, &cassette),
            None => Ok(Self::live(config, workdir)),
        }
    }

    /// Creates a live context. Git commands run inside `workdir`.
    ///
    /// The LLM client is only created when a credential is configured; if
    /// the HTTP client cannot be built the context degrades to template mode.
    #[must_use]
    pub fn live(config: Config, workdir: &Path) -> Self {
        let llm: Option<Box<dyn LlmClient>> = match config.api_key.as_deref() {
            Some(key) => match LiveLlmClient::new(key, &config) {
                Ok(client) => Some(Box::new(client)),
                Err(e) => {
                    warn!(error = %e, "cannot initialize text-generation client, using template");
                    None
                }
            },
            None => {
                info!("no credential configured, obituaries will use the template");
                None
            }
        };

        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitRepo::new(workdir)),
            llm,
            config,
        }
    }

    /// Creates a context whose clock, git and llm ports are served from a
    /// cassette file. The filesystem stays live.
    ///
    /// The llm port is only wired when the cassette recorded llm traffic, so
    /// a cassette without it exercises the template composer.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(config: Config, cassette_path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(cassette_path)?;
        let replayer = CassetteReplayer::new(&cassette);
        let has_llm = replayer.has_port("llm");
        let shared = Arc::new(Mutex::new(replayer));

        let llm: Option<Box<dyn LlmClient>> = if has_llm {
            Some(Box::new(ReplayingLlmClient::new(Arc::clone(&shared))))
        } else {
            None
        };

        Ok(Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&shared))),
            fs: Box::new(LiveFileSystem),
            git: Box::new(ReplayingGitRepo::new(shared)),
            llm,
            config,
        })
    }
}
