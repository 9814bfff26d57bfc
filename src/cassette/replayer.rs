//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette as one FIFO stream per `port::method` pair.
///
/// Streams are independent, so interleaving between ports does not have to
/// match the recording; only the order of calls to the same method does.
pub struct CassetteReplayer {
    streams: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            streams
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { streams }
    }

    /// Take the next interaction recorded for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no interactions left for the pair. The
    /// message names the request and the pairs that do have recordings, since
    /// a mismatch means the replayed build diverged from the recorded one.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(stream) = self.streams.get_mut(&key) else {
            let mut available: Vec<String> =
                self.streams.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method}. \
                 Recorded pairs: [{}]",
                available.join(", ")
            );
        };
        match stream.pop_front() {
            Some(interaction) => interaction,
            None => panic!(
                "Cassette exhausted: every recorded {port}::{method} interaction was consumed"
            ),
        }
    }

    /// Number of interactions not yet served, across all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.streams.values().map(VecDeque::len).sum()
    }
}
