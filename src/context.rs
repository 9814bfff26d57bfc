//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveProcessRunner};
use crate::adapters::recording::{RecordingClock, RecordingFileSystem, RecordingProcessRunner};
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem, ReplayingProcessRunner};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::error::PortError;
use crate::ports::{Clock, FileSystem, ProcessOutput, ProcessRunner};

/// Bundles every port a build run touches.
///
/// Constructors wire up live, recording or replaying adapters; the build
/// core only ever sees the traits.
pub struct ServiceContext {
    /// Filesystem for metadata queries and directory management.
    pub fs: Box<dyn FileSystem>,
    /// Runner for the compiler, linker and test executable.
    pub process: Box<dyn ProcessRunner>,
    /// Clock used to time the run.
    pub clock: Box<dyn Clock>,
}

impl ServiceContext {
    /// Creates a context backed by the real filesystem, processes and clock.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            process: Box::new(LiveProcessRunner),
            clock: Box::new(LiveClock),
        }
    }

    /// Creates a live context whose interactions are recorded below `base_dir`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(base_dir: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base_dir)?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
            process: Box::new(RecordingProcessRunner::new(
                Box::new(LiveProcessRunner),
                Arc::clone(&session.process),
            )),
            clock: Box::new(RecordingClock::new(
                Box::new(LiveClock),
                Arc::clone(&session.clock),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette holding every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = CassetteConfig::load_cassette(path)?;

        // Independent replayers keep per-port cursors separate.
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            process: Box::new(ReplayingProcessRunner::new(CassetteReplayer::new(&cassette))),
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassettes.
    ///
    /// Ports without a cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            process: match replayers.process {
                Some(r) => Box::new(ReplayingProcessRunner::new(r)),
                None => Box::new(PanickingProcessRunner),
            },
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
        })
    }
}

// --- Panicking adapters for ports without a cassette ---

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded for it");
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        unconfigured("fs")
    }
    fn exists(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
    fn is_file(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
    fn modified(&self, _path: &Path) -> Option<SystemTime> {
        unconfigured("fs")
    }
    fn list_dir(&self, _path: &Path) -> Result<Vec<String>, PortError> {
        unconfigured("fs")
    }
    fn create_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        unconfigured("fs")
    }
    fn remove_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        unconfigured("fs")
    }
}

struct PanickingProcessRunner;
impl ProcessRunner for PanickingProcessRunner {
    fn run(&self, _program: &str, _args: &[String]) -> Result<ProcessOutput, PortError> {
        unconfigured("process")
    }
    fn run_inherited(&self, _program: &str, _args: &[String]) -> Result<i32, PortError> {
        unconfigured("process")
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        unconfigured("clock")
    }
}
