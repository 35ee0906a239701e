//! Paths that should exist after the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::layout::AttachmentPaths;

/// Desired local state, accumulated while walking the remote course.
///
/// A path is a member iff it derives from a remote attachment that passed
/// the filter, whether or not it was downloaded this run. The course root
/// is always a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSet {
    dirs: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
}

impl LiveSet {
    pub fn new(course_root: impl Into<PathBuf>) -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(course_root.into());
        Self {
            dirs,
            files: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, paths: &AttachmentPaths) {
        self.dirs.insert(paths.assignment_dir.clone());
        self.dirs.insert(paths.user_dir.clone());
        self.files.insert(paths.file.clone());
    }

    pub fn contains_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }
}
