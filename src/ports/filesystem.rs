//! Filesystem port for metadata queries and directory management.

use std::path::Path;
use std::time::SystemTime;

use crate::error::PortError;

/// Provides the filesystem access the build needs.
///
/// Object and dependency files are the only build cache, so every staleness
/// decision reads through this trait. Fakes can serve timestamps without
/// touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns the modification time, or `None` if the path does not exist.
    fn modified(&self, path: &Path) -> Option<SystemTime>;

    /// Lists the entry names of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError>;

    /// Creates a directory and all missing parents. Existing directories are
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Removes a directory tree. A missing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree exists but cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError>;
}
