//! Artifact tracking for the shared output directory.
//!
//! Executed directives drop files (plots, tables, checkpoints) into the
//! working directory as a side effect. New artifacts are detected by a pure
//! two-snapshot diff of entry names bracketing the whole correction loop;
//! no filesystem watching is involved. Because pipeline steps are strictly
//! sequential, the diff attributes additions unambiguously.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Suffixes recognized as image artifacts (case-sensitive exact match)
pub const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Capture the set of entry names currently present in a directory.
///
/// A directory that does not exist yet reads as empty rather than an error.
pub fn snapshot(dir: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return names,
    };

    for entry in entries.flatten() {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }

    names
}

/// Files that appeared between two snapshots, partitioned by suffix.
///
/// Paths are full paths under the watched directory, in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewArtifacts {
    pub images: Vec<PathBuf>,
    pub other: Vec<PathBuf>,
}

impl NewArtifacts {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.other.is_empty()
    }
}

/// Diff two snapshots of `dir`, keeping additions only.
///
/// Pre-existing files and removals are ignored; concurrent unrelated
/// entries present in both snapshots cancel out.
pub fn diff(dir: &Path, before: &BTreeSet<String>, after: &BTreeSet<String>) -> NewArtifacts {
    let mut artifacts = NewArtifacts::default();

    for name in after.difference(before) {
        let path = dir.join(name);
        if IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            artifacts.images.push(path);
        } else {
            artifacts.other.push(path);
        }
    }

    artifacts
}
