//! `tubuild status` command.

use std::path::Path;

use crate::config::BuildConfig;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::orchestrator::Orchestrator;

/// Execute the `status` command.
///
/// Displays a table of every translation unit, whether it would be
/// recompiled, and why. Nothing is built.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the source directory
/// cannot be listed.
pub fn run(ctx: &ServiceContext, root: &Path) -> Result<(), Error> {
    let config = BuildConfig::load(ctx.fs.as_ref(), root)?;
    let states = Orchestrator::new(ctx, &config, root).status()?;
    if states.is_empty() {
        println!("No translation units found in '{}'.", config.source_dir(root).display());
        return Ok(());
    }

    let rows: Vec<(String, &str, String)> = states
        .iter()
        .map(|(unit, state)| {
            let label = if state.must_recompile() { "stale" } else { "fresh" };
            (display_relative(&unit.source, root), label, state.to_string())
        })
        .collect();

    // Calculate column widths.
    let source_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(6).max(6);

    println!("{:<source_width$}  STATE  REASON", "SOURCE");
    println!("{:-<source_width$}  -----  ------", "");
    for (source, label, reason) in &rows {
        println!("{source:<source_width$}  {label:<5}  {reason}");
    }

    let stale = states.iter().filter(|(_, state)| state.must_recompile()).count();
    println!("\n{stale} of {} unit(s) need recompiling.", states.len());
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
