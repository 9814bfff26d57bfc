//! Make-style dependency files written by `-MMD`.
//!
//! ```text
//! intermediate/test_stack.o: test/test_stack.cpp \
//!   include/gin/stack_frame_allocator.h \
//!   include/gin/allocator.h
//! ```
//!
//! The first line is the object's own record and is always discarded. Every
//! following line is one prerequisite entry.

use std::path::Path;

use crate::ports::FileSystem;
use crate::unit::dependency_file_for;

/// Extracts prerequisite entries from dependency file contents.
///
/// Lines are trimmed, the first one is dropped, and a trailing ` \`
/// continuation marker is stripped from the rest. Lines left empty are not
/// entries; no other line is dropped.
#[must_use]
pub fn parse(contents: &str) -> Vec<String> {
    contents
        .lines()
        .skip(1)
        .map(|line| strip_continuation(line.trim()))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_continuation(line: &str) -> &str {
    match line.strip_suffix('\\') {
        Some(rest) if rest.is_empty() || rest.ends_with(char::is_whitespace) => rest.trim_end(),
        _ => line,
    }
}

/// Loads the prerequisites recorded for `object`.
///
/// A missing or unreadable dependency file yields an empty list: the object
/// then counts as having no known dependencies.
pub fn load(fs: &dyn FileSystem, object: &Path) -> Vec<String> {
    let path = dependency_file_for(object);
    if !fs.exists(&path) {
        tracing::debug!(path = %path.display(), "no dependency file found");
        return Vec::new();
    }
    match fs.read_to_string(&path) {
        Ok(contents) => parse(&contents),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "dependency file unreadable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::LiveFileSystem;

    #[test]
    fn first_line_is_discarded_and_markers_stripped() {
        let contents = "/w/intermediate/a.o: /w/test/a.cpp \\\n  /w/include/a.h \\\n  /w/include/b.h\n";
        assert_eq!(parse(contents), vec!["/w/include/a.h", "/w/include/b.h"]);
    }

    #[test]
    fn n_lines_yield_n_minus_one_entries() {
        let contents = "a.o: a.cpp \\\n x.h \\\n y.h \\\n z.h";
        assert_eq!(parse(contents).len(), 3);
    }

    #[test]
    fn single_line_yields_no_entries() {
        assert!(parse("a.o: a.cpp").is_empty());
    }

    #[test]
    fn empty_file_yields_no_entries() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn blank_and_lone_marker_lines_are_not_entries() {
        let contents = "a.o: a.cpp \\\n  \\\n\n  x.h\n";
        assert_eq!(parse(contents), vec!["x.h"]);
    }

    #[test]
    fn backslash_without_whitespace_is_part_of_the_path() {
        assert_eq!(parse("a.o: \\\n dir\\"), vec!["dir\\"]);
    }

    // gcc and clang pack prerequisites up to ~75 columns per line; such a
    // line names no real file, so its unit is rebuilt on every run.
    #[test]
    fn packed_prerequisite_line_is_one_unresolvable_entry() {
        assert_eq!(parse("a.o: a.cpp \\\n x.h y.h \\\n"), vec!["x.h y.h"]);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&LiveFileSystem, &dir.path().join("a.o")).is_empty());
    }

    #[test]
    fn load_reads_file_next_to_object() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.d"), "a.o: a.cpp \\\n  include/a.h\n").unwrap();

        assert_eq!(load(&LiveFileSystem, &dir.path().join("a.o")), vec!["include/a.h"]);
    }
}
