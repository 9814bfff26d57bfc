//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;

use super::{next_output, replay_result, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Serves recorded filesystem answers. Paths are not checked against the
/// recording; only call order per method matters.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn value<T: serde::de::DeserializeOwned>(&self, method: &str) -> T {
        replay_value(next_output(&self.replayer, "fs", method), &format!("fs::{method}"))
    }

    fn result<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, PortError> {
        replay_result(next_output(&self.replayer, "fs", method), &format!("fs::{method}"))
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        self.result("read_to_string")
    }

    fn exists(&self, _path: &Path) -> bool {
        self.value("exists")
    }

    fn is_file(&self, _path: &Path) -> bool {
        self.value("is_file")
    }

    fn modified(&self, _path: &Path) -> Option<SystemTime> {
        self.value("modified")
    }

    fn list_dir(&self, _path: &Path) -> Result<Vec<String>, PortError> {
        self.result("list_dir")
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        self.result("create_dir_all")
    }

    fn remove_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        self.result("remove_dir_all")
    }
}
