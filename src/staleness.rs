//! Decides whether an object file must be recompiled.
//!
//! The decision only looks at modification times, read through a stat
//! lookup the caller supplies, so it runs the same against the real disk,
//! an in-memory fake or a replayed cassette.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::depfile;
use crate::ports::FileSystem;

/// Outcome of a staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The object exists and no prerequisite is newer.
    Fresh,
    /// The object file does not exist.
    ObjectMissing,
    /// A recorded prerequisite no longer exists.
    DependencyMissing(PathBuf),
    /// A recorded prerequisite was modified after the object.
    DependencyNewer(PathBuf),
}

impl Staleness {
    /// Returns `true` unless the object is up to date.
    #[must_use]
    pub fn must_recompile(&self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => write!(f, "up to date"),
            Self::ObjectMissing => write!(f, "object file missing"),
            Self::DependencyMissing(path) => write!(f, "dependency missing: {}", path.display()),
            Self::DependencyNewer(path) => write!(f, "dependency changed: {}", path.display()),
        }
    }
}

/// Evaluates staleness from an object timestamp and its prerequisites.
///
/// `object_modified` is `None` when the object does not exist, in which case
/// no prerequisite is looked up. Otherwise prerequisites are scanned in
/// order and the first missing one, or the first one strictly newer than the
/// object, decides. Equal timestamps count as fresh.
pub fn evaluate<F>(
    object_modified: Option<SystemTime>,
    dependencies: &[PathBuf],
    mut stat: F,
) -> Staleness
where
    F: FnMut(&Path) -> Option<SystemTime>,
{
    let Some(object_time) = object_modified else {
        return Staleness::ObjectMissing;
    };
    for dependency in dependencies {
        match stat(dependency) {
            None => return Staleness::DependencyMissing(dependency.clone()),
            Some(time) if time > object_time => {
                return Staleness::DependencyNewer(dependency.clone());
            }
            Some(_) => {}
        }
    }
    Staleness::Fresh
}

/// Checks one object against the filesystem.
///
/// `root` must be absolute: the compiler receives paths under it and writes
/// them back verbatim. Any relative prerequisite still resolves against it.
pub fn check(fs: &dyn FileSystem, root: &Path, object: &Path) -> Staleness {
    let Some(object_time) = fs.modified(object) else {
        return Staleness::ObjectMissing;
    };
    let dependencies: Vec<PathBuf> =
        depfile::load(fs, object).into_iter().map(|dep| root.join(dep)).collect();
    evaluate(Some(object_time), &dependencies, |path| fs.modified(path))
}
