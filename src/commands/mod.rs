//! Command dispatch and handlers.

pub mod clean;
pub mod status;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::context::ServiceContext;
use crate::error::Error;

/// Dispatch a parsed command to its handler.
///
/// When `TUBUILD_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns the handler's error, or [`Error::Recording`] if the recording
/// session cannot be started or saved.
pub fn dispatch(command: &Command, root: &Path) -> Result<(), Error> {
    let root = absolute_root(root)?;
    let (ctx, session) = if let Ok(path) = env::var("TUBUILD_RECORD") {
        let (ctx, session) =
            ServiceContext::recording_at(&PathBuf::from(path)).map_err(Error::Recording)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(command, &root, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        return keep_command_error(result, finish_recording(session));
    }

    result
}

/// Anchors `root` to the current directory.
///
/// The toolchain runs in tubuild's own working directory and records
/// dependency paths exactly as it was given them, so every path handed to it
/// must already be absolute.
fn absolute_root(root: &Path) -> Result<PathBuf, Error> {
    std::path::absolute(root)
        .map_err(|e| Error::Io { path: root.to_path_buf(), source: e.into() })
}

/// A failed command keeps its own error (and exit status) even when the
/// recording cannot be saved.
fn keep_command_error(result: Result<(), Error>, recorded: Result<(), Error>) -> Result<(), Error> {
    match (result, recorded) {
        (Err(command), Err(recording)) => {
            tracing::warn!(error = %recording, "recording could not be saved");
            Err(command)
        }
        (Ok(()), recorded) => recorded,
        (Err(command), Ok(())) => Err(command),
    }
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns the handler's error.
pub fn dispatch_with_context(
    command: &Command,
    root: &Path,
    ctx: &ServiceContext,
) -> Result<(), Error> {
    match command {
        Command::Test { jobs } => test::run(ctx, root, *jobs),
        Command::Status => status::run(ctx, root),
        Command::Clean => clean::run(ctx, root),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), Error> {
    let output_dir = session.finish().map_err(Error::Recording)?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
