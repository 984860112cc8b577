//! Serves a cassette's interactions back in recorded order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Pending interactions, queued per `(port, method)` so that interleaving
/// between unrelated ports does not matter on replay.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Queues every interaction of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Returns `true` if any interaction was recorded for `port`.
    #[must_use]
    pub fn has_port(&self, port: &str) -> bool {
        self.queues.keys().any(|(p, _)| p == port)
    }

    /// Takes the next interaction recorded for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics if nothing was recorded for the pair, or everything recorded
    /// has already been served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut recorded: Vec<String> = self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            recorded.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method} (recorded: [{}])",
                recorded.join(", ")
            );
        };
        queue
            .pop_front()
            .unwrap_or_else(|| panic!("Cassette exhausted: every {port}::{method} interaction was already replayed"))
    }
}
