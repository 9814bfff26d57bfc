//! Process runner port for invoking the compiler, linker and test binary.

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// The observed result of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs with an explicit argument vector.
///
/// The toolchain is an opaque executable: the build core only looks at the
/// exit status and relays captured output.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned. A process that runs
    /// and exits non-zero is not an error.
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, PortError>;

    /// Runs `program` with `args` attached to tubuild's own stdout and
    /// stderr, so its output streams while it runs, and returns the exit
    /// code (`-1` when killed by a signal).
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_inherited(&self, program: &str, args: &[String]) -> Result<i32, PortError>;
}
