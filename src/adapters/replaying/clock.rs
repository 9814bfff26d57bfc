//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{next_output, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Serves recorded clock readings from a cassette.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        replay_value(next_output(&self.replayer, "clock", "now"), "clock::now")
    }
}
