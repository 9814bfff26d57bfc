//! Translation units and their derived artifact paths.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::ports::FileSystem;

/// One source file compiled independently into one object file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// The source file.
    pub source: PathBuf,
    /// The object file produced from `source`.
    pub object: PathBuf,
}

impl TranslationUnit {
    /// Pairs `source` with `<intermediate_dir>/<stem>.o`.
    #[must_use]
    pub fn new(source: PathBuf, intermediate_dir: &Path) -> Self {
        let mut name = source.file_stem().unwrap_or_default().to_os_string();
        name.push(".o");
        let object = intermediate_dir.join(name);
        Self { source, object }
    }

    /// The dependency file written next to the object by `-MMD`.
    #[must_use]
    pub fn dependency_file(&self) -> PathBuf {
        dependency_file_for(&self.object)
    }
}

/// Maps an object path to its dependency file (`.o` → `.d`).
#[must_use]
pub fn dependency_file_for(object: &Path) -> PathBuf {
    object.with_extension("d")
}

/// Lists the translation units in `source_dir`.
///
/// Only regular files whose extension equals `extension` qualify. Units come
/// back in name order so one run pairs sources and objects consistently.
///
/// # Errors
///
/// Returns [`Error::Io`] if the source directory cannot be listed.
pub fn enumerate(
    fs: &dyn FileSystem,
    source_dir: &Path,
    extension: &str,
    intermediate_dir: &Path,
) -> Result<Vec<TranslationUnit>, Error> {
    let mut names = fs
        .list_dir(source_dir)
        .map_err(|source| Error::Io { path: source_dir.to_path_buf(), source })?;
    names.sort();

    let units = names
        .into_iter()
        .map(|name| source_dir.join(name))
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .filter(|path| fs.is_file(path))
        .map(|source| TranslationUnit::new(source, intermediate_dir))
        .collect();
    Ok(units)
}
