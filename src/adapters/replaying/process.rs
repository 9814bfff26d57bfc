//! Replaying adapter for the `ProcessRunner` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::process::{ProcessOutput, ProcessRunner};

/// Serves recorded process results from a cassette.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a replaying process runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run(&self, _program: &str, _args: &[String]) -> Result<ProcessOutput, PortError> {
        replay_result(next_output(&self.replayer, "process", "run"), "process::run")
    }

    fn run_inherited(&self, _program: &str, _args: &[String]) -> Result<i32, PortError> {
        replay_result(
            next_output(&self.replayer, "process", "run_inherited"),
            "process::run_inherited",
        )
    }
}
