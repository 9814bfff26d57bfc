//! Per-port cassette selection for replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Cassette file paths, one optional entry per port.
///
/// Ports left as `None` are served by panicking adapters during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the filesystem port.
    pub fs: Option<PathBuf>,
    /// Cassette for the process runner port.
    pub process: Option<PathBuf>,
    /// Cassette for the clock port.
    pub clock: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
pub struct PortReplayers {
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the process runner port.
    pub process: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Read and parse a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<Cassette, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Load every configured cassette into its own replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| {
            path.as_deref()
                .map(|p| Self::load_cassette(p).map(|c| CassetteReplayer::new(&c)))
                .transpose()
        };
        Ok(PortReplayers {
            fs: load(&self.fs)?,
            process: load(&self.process)?,
            clock: load(&self.clock)?,
        })
    }
}
