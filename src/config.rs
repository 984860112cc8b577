//! Runtime configuration read from the process environment.
//!
//! A `.env` file in the working directory (or a parent) is loaded first via
//! `dotenvy`, so the credential can live outside the shell profile.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

/// Variable holding the text-generation credential. Absence selects the
/// template composer; it is never an error.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
/// Overrides the model used for generated obituaries.
pub const MODEL_VAR: &str = "OBITUARY_MODEL";
/// Overrides the messages endpoint.
pub const API_URL_VAR: &str = "OBITUARY_API_URL";
/// Overrides the transport timeout, in whole seconds.
pub const TIMEOUT_VAR: &str = "OBITUARY_TIMEOUT_SECS";
/// Points at a cassette; when set, clock, git and llm are replayed from it.
pub const REPLAY_VAR: &str = "OBITUARY_REPLAY";

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Credential for the generative composer, if any.
    pub api_key: Option<String>,
    /// Model identifier sent with each completion request.
    pub model: String,
    /// Messages endpoint URL.
    pub api_url: String,
    /// Upper bound on the single outbound request.
    pub timeout: Duration,
    /// Cassette to replay instead of talking to git and the network.
    pub replay: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            replay: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let loaded = dotenvy::dotenv();
        if let Some(e) = dotenv_problem(&loaded) {
            debug!(error = %e, "cannot load .env, using the process environment only");
        }
        if let Ok(path) = loaded {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout = match non_empty(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}, using default");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            api_key: non_empty(API_KEY_VAR),
            model: non_empty(MODEL_VAR).unwrap_or(defaults.model),
            api_url: non_empty(API_URL_VAR).unwrap_or(defaults.api_url),
            timeout,
            replay: non_empty(REPLAY_VAR).map(PathBuf::from),
        }
    }
}

/// A `.env` load error worth reporting; a missing file is normal.
fn dotenv_problem<T>(result: &Result<T, dotenvy::Error>) -> Option<&dotenvy::Error> {
    result.as_ref().err().filter(|e| !e.not_found())
}
