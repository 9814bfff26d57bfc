//! Recording session owning one recorder per port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Per-port recorders for one `tubuild` invocation.
///
/// Cassettes are written to a timestamped directory below the requested
/// base directory as `<port>.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for process interactions.
    pub process: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Start a session below `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory already exists or cannot be
    /// created.
    pub fn new(base_dir: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = base_dir.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self {
            fs: make_recorder("fs"),
            process: make_recorder("process"),
            clock: make_recorder("clock"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every port's cassette and return the session directory.
    ///
    /// All recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a cassette
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(recorder: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| format!("Recording adapter for {port} is still alive"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.fs, "fs")?;
        finish_one(self.process, "process")?;
        finish_one(self.clock, "clock")?;
        Ok(self.output_dir)
    }
}
