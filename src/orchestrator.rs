//! Drives one build: stale check and compile per unit, link, execute.
//!
//! ```text
//! Idle → Enumerating → PerUnit{Stale-Check → (Skip | Compile)}
//!      → (Abort-on-CompileFailure | Link?) → (Abort-on-LinkFailure | Execute) → Done
//! ```
//!
//! A failed compile never stops the other units; the run aborts only once
//! every unit has been attempted.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::BuildConfig;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::staleness::{self, Staleness};
use crate::unit::{self, TranslationUnit};

/// Result of the per-unit phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Every object in enumeration order; the link input.
    pub objects: Vec<PathBuf>,
    /// Sources whose compiler was invoked, successfully or not.
    pub rebuilt: Vec<PathBuf>,
    /// Sources whose compilation failed.
    pub failed: Vec<PathBuf>,
    /// Number of up-to-date units that were skipped.
    pub skipped: usize,
}

impl BuildOutcome {
    /// Returns `true` if at least one unit was recompiled.
    #[must_use]
    pub fn any_rebuilt(&self) -> bool {
        !self.rebuilt.is_empty()
    }

    /// Returns `true` if at least one compilation failed.
    #[must_use]
    pub fn any_failed(&self) -> bool {
        !self.failed.is_empty()
    }

    fn push(&mut self, unit: &TranslationUnit, result: UnitResult) {
        self.objects.push(unit.object.clone());
        match result {
            UnitResult::Skipped => self.skipped += 1,
            UnitResult::Compiled => self.rebuilt.push(unit.source.clone()),
            UnitResult::Failed => {
                self.rebuilt.push(unit.source.clone());
                self.failed.push(unit.source.clone());
            }
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Per-unit results.
    pub outcome: BuildOutcome,
    /// Whether the link step ran.
    pub linked: bool,
    /// Exit status of the test executable, if it was run.
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitResult {
    Skipped,
    Compiled,
    Failed,
}

/// Runs builds for one project root.
pub struct Orchestrator<'a> {
    ctx: &'a ServiceContext,
    config: &'a BuildConfig,
    root: PathBuf,
    compile_args: Vec<String>,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator for the project at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a BuildConfig, root: &Path) -> Self {
        Self {
            ctx,
            config,
            root: root.to_path_buf(),
            compile_args: config.common_compile_args(root),
        }
    }

    /// Runs the full cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the output directories cannot be created or
    /// the source directory cannot be listed, [`Error::CompileFailed`] after
    /// all units were attempted and at least one failed, and
    /// [`Error::LinkFailed`] if linking fails.
    pub fn run(&self) -> Result<RunReport, Error> {
        let started = self.ctx.clock.now();

        self.ensure_output_dirs()?;
        let units = self.units()?;
        let outcome = self.build_units(&units);
        if outcome.any_failed() {
            return Err(Error::CompileFailed { failed: outcome.failed });
        }

        let executable = self.config.executable(&self.root);
        let linked = self.needs_link(&outcome, &executable);
        if linked {
            self.link(&outcome.objects, &executable)?;
        }
        let exit_code = self.execute(&executable);

        let elapsed = (self.ctx.clock.now() - started).to_std().unwrap_or_default();
        println!(
            "Finished: {} compiled, {} up to date in {:.2}s",
            outcome.rebuilt.len(),
            outcome.skipped,
            elapsed.as_secs_f64()
        );
        Ok(RunReport { outcome, linked, exit_code })
    }

    /// Reports the staleness of every unit without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source directory cannot be listed.
    pub fn status(&self) -> Result<Vec<(TranslationUnit, Staleness)>, Error> {
        Ok(self
            .units()?
            .into_iter()
            .map(|unit| {
                let state = staleness::check(self.ctx.fs.as_ref(), &self.root, &unit.object);
                (unit, state)
            })
            .collect())
    }

    fn ensure_output_dirs(&self) -> Result<(), Error> {
        for dir in [self.config.intermediate_dir(&self.root), self.config.bin_dir(&self.root)] {
            self.ctx.fs.create_dir_all(&dir).map_err(|source| Error::Io { path: dir, source })?;
        }
        Ok(())
    }

    fn units(&self) -> Result<Vec<TranslationUnit>, Error> {
        unit::enumerate(
            self.ctx.fs.as_ref(),
            &self.config.source_dir(&self.root),
            &self.config.source_extension,
            &self.config.intermediate_dir(&self.root),
        )
    }

    /// Checks and compiles every unit, on a thread pool when `jobs > 1`.
    fn build_units(&self, units: &[TranslationUnit]) -> BuildOutcome {
        let results: Vec<UnitResult> = if self.config.jobs > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(self.config.jobs).build() {
                Ok(pool) => pool.install(|| units.par_iter().map(|u| self.build_unit(u)).collect()),
                Err(e) => {
                    tracing::warn!(error = %e, "thread pool unavailable, compiling sequentially");
                    units.iter().map(|u| self.build_unit(u)).collect()
                }
            }
        } else {
            units.iter().map(|u| self.build_unit(u)).collect()
        };

        let mut outcome = BuildOutcome::default();
        for (unit, result) in units.iter().zip(results) {
            outcome.push(unit, result);
        }
        outcome
    }

    fn build_unit(&self, unit: &TranslationUnit) -> UnitResult {
        let state = staleness::check(self.ctx.fs.as_ref(), &self.root, &unit.object);
        if !state.must_recompile() {
            println!("Skipping '{}'...", unit.source.display());
            return UnitResult::Skipped;
        }
        tracing::debug!(source = %unit.source.display(), reason = %state, "recompiling");
        println!("Compiling '{}'...", unit.source.display());
        if self.compile(unit) {
            UnitResult::Compiled
        } else {
            UnitResult::Failed
        }
    }

    fn compile(&self, unit: &TranslationUnit) -> bool {
        let mut args = self.compile_args.clone();
        args.push(unit.source.display().to_string());
        args.push("-o".to_string());
        args.push(unit.object.display().to_string());

        match self.ctx.process.run(&self.config.compiler, &args) {
            Ok(output) => {
                relay(&output.stdout, &output.stderr);
                output.success()
            }
            Err(e) => {
                eprintln!("Failed to run '{}': {e}", self.config.compiler);
                false
            }
        }
    }

    /// Links when anything was rebuilt, or when there are objects but the
    /// executable is gone.
    fn needs_link(&self, outcome: &BuildOutcome, executable: &Path) -> bool {
        if outcome.any_rebuilt() {
            return true;
        }
        if !outcome.objects.is_empty() && !self.ctx.fs.exists(executable) {
            tracing::debug!(path = %executable.display(), "executable missing, relinking");
            return true;
        }
        false
    }

    fn link(&self, objects: &[PathBuf], executable: &Path) -> Result<(), Error> {
        println!("Linking   '{}'...", executable.display());
        let mut args: Vec<String> = objects.iter().map(|o| o.display().to_string()).collect();
        args.push("-o".to_string());
        args.push(executable.display().to_string());

        let output = self.ctx.process.run(&self.config.linker, &args).map_err(|e| {
            Error::LinkFailed { executable: executable.to_path_buf(), reason: e.to_string() }
        })?;
        relay(&output.stdout, &output.stderr);
        if output.success() {
            Ok(())
        } else {
            Err(Error::LinkFailed {
                executable: executable.to_path_buf(),
                reason: format!("linker exited with status {}", output.exit_code),
            })
        }
    }

    /// Runs the test executable with its output streaming to the terminal.
    /// Its outcome is reported, never propagated.
    fn execute(&self, executable: &Path) -> Option<i32> {
        if !self.ctx.fs.exists(executable) {
            tracing::warn!(path = %executable.display(), "no executable to run");
            return None;
        }
        println!("Executing '{}'...", executable.display());
        match self.ctx.process.run_inherited(&executable.display().to_string(), &[]) {
            Ok(code) => {
                if code != 0 {
                    println!("Test executable exited with status {code}");
                }
                Some(code)
            }
            Err(e) => {
                tracing::warn!(path = %executable.display(), error = %e, "failed to launch executable");
                None
            }
        }
    }
}

fn relay(stdout: &str, stderr: &str) {
    if !stdout.is_empty() {
        print!("{stdout}");
    }
    if !stderr.is_empty() {
        eprint!("{stderr}");
    }
}
