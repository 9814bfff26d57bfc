//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a recording filesystem wrapping `inner`.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<O: Serialize>(&self, method: &str, path: &Path, output: &O) {
        record_interaction(&self.recorder, "fs", method, &PathInput::from(path), output);
    }

    fn record_result<T: Serialize>(&self, method: &str, path: &Path, result: &Result<T, PortError>) {
        record_result(&self.recorder, "fs", method, &PathInput::from(path), result);
    }
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

impl From<&Path> for PathInput {
    fn from(path: &Path) -> Self {
        Self { path: path.display().to_string() }
    }
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let result = self.inner.read_to_string(path);
        self.record_result("read_to_string", path, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        self.record("exists", path, &result);
        result
    }

    fn is_file(&self, path: &Path) -> bool {
        let result = self.inner.is_file(path);
        self.record("is_file", path, &result);
        result
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        let result = self.inner.modified(path);
        self.record("modified", path, &result);
        result
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let result = self.inner.list_dir(path);
        self.record_result("list_dir", path, &result);
        result
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.create_dir_all(path);
        self.record_result("create_dir_all", path, &result);
        result
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.remove_dir_all(path);
        self.record_result("remove_dir_all", path, &result);
        result
    }
}
