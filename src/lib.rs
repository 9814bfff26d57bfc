//! Core library entry for the `tubuild` CLI.
//!
//! `tubuild` compiles the translation units of a C++ test suite, skipping
//! those whose object file is newer than every dependency the compiler
//! recorded for it, relinks when anything changed, and runs the result.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod depfile;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod staleness;
pub mod unit;

#[cfg(test)]
mod testing;

use clap::Parser;

pub use error::Error;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails, otherwise the
/// command's own error.
pub fn run<I, T>(args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| Error::Usage(err.to_string()))?;
    execute(&cli)
}

/// Execute an already parsed command line.
///
/// # Errors
///
/// Returns the command's error.
pub fn execute(cli: &cli::Cli) -> Result<(), Error> {
    commands::dispatch(&cli.command, &cli.root)
}

#[cfg(test)]
mod tests {
    use super::{run, Error};

    #[test]
    fn run_status_on_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("test")).unwrap();
        let root = dir.path().to_str().unwrap();

        assert!(run(["tubuild", "--root", root, "status"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["tubuild", "unknown"]);
        assert!(matches!(result, Err(Error::Usage(_))));
    }
}
