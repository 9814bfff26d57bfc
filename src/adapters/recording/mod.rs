//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod filesystem;
pub mod process;

pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;
pub use process::RecordingProcessRunner;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record an interaction whose output is a plain value.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    match (serde_json::to_value(input), serde_json::to_value(output)) {
        (Ok(input), Ok(output)) => push(recorder, port, method, input, output),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(port, method, error = %e, "skipping unserializable interaction");
        }
    }
}

/// Record a fallible interaction as `{"ok": value}` or `{"err": message}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(value) => serde_json::to_value(value).map(|v| serde_json::json!({ "ok": v })),
        Err(e) => Ok(serde_json::json!({ "err": e.to_string() })),
    };
    match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => push(recorder, port, method, input, output),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(port, method, error = %e, "skipping unserializable interaction");
        }
    }
}

fn push(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => tracing::warn!(port, method, "recorder lock poisoned; interaction dropped"),
    }
}
