//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod process;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use process::ReplayingProcessRunner;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Take the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Decode a plain recorded value.
///
/// # Panics
///
/// Panics when the cassette holds a value of the wrong shape; replay cannot
/// continue meaningfully past a corrupted recording.
pub(crate) fn replay_value<T: DeserializeOwned>(output: serde_json::Value, context: &str) -> T {
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{context}: recorded output has the wrong shape: {e}"))
}

/// Decode a recorded `{"ok": value}` / `{"err": message}` result.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
