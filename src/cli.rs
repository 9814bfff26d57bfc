//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `tubuild`.
#[derive(Debug, Parser)]
#[command(name = "tubuild", version, about = "Incrementally build and run a C++ test suite")]
pub struct Cli {
    /// Project root holding the sources and `tubuild.yaml`.
    #[arg(long, global = true, env = "TUBUILD_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile stale units, relink if needed and run the test executable.
    Test {
        /// Units compiled concurrently; overrides `jobs` in `tubuild.yaml`.
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Show which units would be recompiled and why.
    Status,
    /// Remove the intermediate and binary directories.
    Clean,
}
