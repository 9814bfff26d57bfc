//! Build configuration loaded from `tubuild.yaml`.
//!
//! Every field has a default, so a project without a configuration file
//! builds `test/*.cpp` with `clang++` into `intermediate/` and `bin/test`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::ports::FileSystem;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "tubuild.yaml";

/// Toolchain, flags and directory layout for a build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Compiler program.
    pub compiler: String,
    /// Linker program.
    pub linker: String,
    /// Warning names, passed as `-W<name>`.
    pub warnings: Vec<String>,
    /// Feature flags, passed as `-f<name>`.
    pub flags: Vec<String>,
    /// Extra compiler arguments, passed verbatim.
    pub extra_flags: Vec<String>,
    /// Include directories, passed as `-I<dir>`.
    pub include_dirs: Vec<PathBuf>,
    /// Directory holding the translation units.
    pub source_dir: PathBuf,
    /// Extension identifying translation units, without the dot.
    pub source_extension: String,
    /// Directory receiving object and dependency files.
    pub intermediate_dir: PathBuf,
    /// Directory receiving the linked executable.
    pub bin_dir: PathBuf,
    /// File name of the linked executable.
    pub exec_name: String,
    /// Number of units checked and compiled concurrently.
    pub jobs: usize,
}

const DEFAULT_WARNINGS: &[&str] = &[
    "no-trigraphs",
    "no-missing-field-initializers",
    "no-missing-prototypes",
    "error=return-type",
    "unreachable-code",
    "no-non-virtual-dtor",
    "no-overloaded-virtual",
    "no-exit-time-destructors",
    "no-missing-braces",
    "parentheses",
    "switch",
    "unused-function",
    "no-unused-label",
    "no-unused-parameter",
    "unused-variable",
    "unused-value",
    "empty-body",
    "conditional-uninitialized",
    "no-unknown-pragmas",
    "no-shadow",
    "no-four-char-constants",
    "no-conversion",
    "constant-conversion",
    "int-conversion",
    "bool-conversion",
    "enum-conversion",
    "shorten-64-to-32",
    "no-newline-eof",
    "no-c++11-extensions",
    "no-sign-conversion",
    "deprecated-declarations",
    "invalid-offsetof",
];

const DEFAULT_FLAGS: &[&str] =
    &["no-rtti", "asm-blocks", "strict-aliasing", "visibility-inlines-hidden"];

// `-MMD` makes the compiler write the `.d` file next to the object.
const DEFAULT_EXTRA_FLAGS: &[&str] = &["-std=c++11", "-c", "-g", "-DDEBUG=1", "-O0", "-MMD"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: "clang++".to_string(),
            linker: "clang++".to_string(),
            warnings: owned(DEFAULT_WARNINGS),
            flags: owned(DEFAULT_FLAGS),
            extra_flags: owned(DEFAULT_EXTRA_FLAGS),
            include_dirs: vec![PathBuf::from("external/catch-1.1.1"), PathBuf::from("include")],
            source_dir: PathBuf::from("test"),
            source_extension: "cpp".to_string(),
            intermediate_dir: PathBuf::from("intermediate"),
            bin_dir: PathBuf::from("bin"),
            exec_name: "test".to_string(),
            jobs: 1,
        }
    }
}

impl BuildConfig {
    /// Loads `<root>/tubuild.yaml`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read,
    /// parsed or validated.
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        if !fs.exists(&path) {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = fs
            .read_to_string(&path)
            .map_err(|e| Error::Config { path: path.clone(), reason: e.to_string() })?;
        Self::from_yaml(&content).map_err(|reason| Error::Config { path, reason })
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns a description of the first parse or validation failure.
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("compiler", &self.compiler),
            ("linker", &self.linker),
            ("exec_name", &self.exec_name),
            ("source_extension", &self.source_extension),
        ] {
            if value.trim().is_empty() {
                return Err(format!("`{field}` must not be empty"));
            }
        }
        if self.jobs == 0 {
            return Err("`jobs` must be at least 1".to_string());
        }
        Ok(())
    }

    /// Arguments shared by every compile, in toolchain order: warnings,
    /// feature flags, extra flags, include paths.
    #[must_use]
    pub fn common_compile_args(&self, root: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(
            self.warnings.len() + self.flags.len() + self.extra_flags.len() + self.include_dirs.len(),
        );
        args.extend(self.warnings.iter().map(|w| format!("-W{w}")));
        args.extend(self.flags.iter().map(|f| format!("-f{f}")));
        args.extend(self.extra_flags.iter().cloned());
        args.extend(self.include_dirs.iter().map(|dir| format!("-I{}", root.join(dir).display())));
        args
    }

    /// Resolved source directory.
    #[must_use]
    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.source_dir)
    }

    /// Resolved intermediate directory.
    #[must_use]
    pub fn intermediate_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.intermediate_dir)
    }

    /// Resolved binary directory.
    #[must_use]
    pub fn bin_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.bin_dir)
    }

    /// Resolved path of the linked executable.
    #[must_use]
    pub fn executable(&self, root: &Path) -> PathBuf {
        self.bin_dir(root).join(&self.exec_name)
    }
}
