//! Error types for build runs.

use std::path::PathBuf;

/// Boxed error returned by port methods.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end a `tubuild` invocation.
///
/// Recoverable conditions (a missing dependency file, a missing
/// prerequisite) never surface here; they are folded into the staleness
/// decision instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line could not be parsed.
    #[error("{0}")]
    Usage(String),

    /// The configuration file exists but is unreadable or invalid.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// The configuration file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying port error.
        source: PortError,
    },

    /// One or more translation units failed to compile.
    #[error("{} translation unit(s) failed to compile", .failed.len())]
    CompileFailed {
        /// Source paths whose compilation failed.
        failed: Vec<PathBuf>,
    },

    /// The link step failed.
    #[error("linking {executable} failed: {reason}")]
    LinkFailed {
        /// The executable that was being produced.
        executable: PathBuf,
        /// The linker status or launch error.
        reason: String,
    },

    /// A recording session could not be started or written.
    #[error("recording error: {0}")]
    Recording(String),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Compile and link failures get their own statuses so callers can tell
    /// a broken build from a broken invocation.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CompileFailed { .. } => 2,
            Self::LinkFailed { .. } => 3,
            Self::Usage(_) | Self::Config { .. } | Self::Io { .. } | Self::Recording(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failed_display_counts_units() {
        let err = Error::CompileFailed {
            failed: vec![PathBuf::from("test/a.cpp"), PathBuf::from("test/b.cpp")],
        };
        assert_eq!(err.to_string(), "2 translation unit(s) failed to compile");
    }

    #[test]
    fn io_error_display() {
        let err = Error::Io {
            path: PathBuf::from("/work/intermediate"),
            source: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("intermediate"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn exit_codes_distinguish_compile_and_link() {
        let compile = Error::CompileFailed { failed: Vec::new() };
        let link = Error::LinkFailed { executable: PathBuf::from("bin/test"), reason: "1".into() };
        let usage = Error::Usage("bad flag".into());

        assert_eq!(compile.exit_code(), 2);
        assert_eq!(link.exit_code(), 3);
        assert_eq!(usage.exit_code(), 1);
    }
}
