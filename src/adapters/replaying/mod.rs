//! Replaying adapters that serve recorded interactions.
//!
//! All adapters built from one cassette share a single replayer; the
//! replayer keeps an independent cursor per port/method pair.

pub mod clock;
pub mod git;
pub mod llm;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

pub use clock::ReplayingClock;
pub use git::ReplayingGitRepo;
pub use llm::ReplayingLlmClient;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Shared handle to a replayer.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Pops the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics if the replayer lock is poisoned or the cassette is exhausted.
pub(crate) fn next_output(replayer: &SharedReplayer, port: &str, method: &str) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Decodes a recorded `Result`: `{"ok": value}` or `{"err": "message"}`.
/// A bare value is treated as `ok`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
