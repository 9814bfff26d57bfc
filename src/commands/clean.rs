//! `tubuild clean` command.

use std::path::Path;

use crate::config::BuildConfig;
use crate::context::ServiceContext;
use crate::error::Error;

/// Execute the `clean` command, removing every build artifact.
///
/// Directories that are already gone are not an error.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a directory cannot be
/// removed.
pub fn run(ctx: &ServiceContext, root: &Path) -> Result<(), Error> {
    let config = BuildConfig::load(ctx.fs.as_ref(), root)?;
    for dir in [config.intermediate_dir(root), config.bin_dir(root)] {
        println!("Removing  '{}'...", dir.display());
        ctx.fs.remove_dir_all(&dir).map_err(|source| Error::Io { path: dir, source })?;
    }
    Ok(())
}
