//! Remove local files and directories that no remote attachment backs.
//!
//! Walks the course root post-order (children before their directory), so
//! by the time a stale directory is removed every stale entry inside it is
//! already gone. Directories are removed with `remove_dir`, never
//! recursively: a stale directory that still has entries means the live set
//! is wrong, and the run stops.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{io_err, SyncError};
use crate::live::LiveSet;

/// What happened to one stale path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    DeletedFile { path: PathBuf },
    DeletedDir { path: PathBuf },
    WouldDeleteFile { path: PathBuf },
    WouldDeleteDir { path: PathBuf },
}

impl PruneOutcome {
    pub fn path(&self) -> &Path {
        match self {
            PruneOutcome::DeletedFile { path }
            | PruneOutcome::DeletedDir { path }
            | PruneOutcome::WouldDeleteFile { path }
            | PruneOutcome::WouldDeleteDir { path } => path,
        }
    }
}

/// Stale entries under a course root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StalePaths {
    pub files: Vec<PathBuf>,
    /// Deepest first; every directory follows its subdirectories.
    pub dirs: Vec<PathBuf>,
}

/// Collect everything under `course_root` that is not in `live`.
///
/// A missing course root has nothing stale in it. Symlinks are not followed
/// and count as files.
pub fn find_stale(course_root: &Path, live: &LiveSet) -> Result<StalePaths, SyncError> {
    let mut stale = StalePaths::default();
    match std::fs::symlink_metadata(course_root) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stale),
        Err(e) => return Err(io_err(course_root, e)),
    }

    let walker = WalkDir::new(course_root)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| SyncError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| course_root.to_path_buf()),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            if !live.contains_dir(path) {
                stale.dirs.push(path.to_path_buf());
            }
        } else if !live.contains_file(path) {
            stale.files.push(path.to_path_buf());
        }
    }
    Ok(stale)
}

/// Delete stale files, then stale directories children-first.
///
/// In dry-run mode only reports.
pub fn prune(
    course_root: &Path,
    live: &LiveSet,
    dry_run: bool,
) -> Result<Vec<PruneOutcome>, SyncError> {
    let stale = find_stale(course_root, live)?;
    let mut outcomes = Vec::with_capacity(stale.files.len() + stale.dirs.len());

    for path in stale.files {
        if dry_run {
            tracing::info!("need to delete file {}", path.display());
            outcomes.push(PruneOutcome::WouldDeleteFile { path });
            continue;
        }
        tracing::info!("deleting file {}", path.display());
        std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        outcomes.push(PruneOutcome::DeletedFile { path });
    }

    for path in stale.dirs {
        if dry_run {
            tracing::info!("need to delete directory {}", path.display());
            outcomes.push(PruneOutcome::WouldDeleteDir { path });
            continue;
        }
        tracing::info!("deleting dir {}", path.display());
        remove_empty_dir(&path)?;
        outcomes.push(PruneOutcome::DeletedDir { path });
    }

    Ok(outcomes)
}

fn remove_empty_dir(path: &Path) -> Result<(), SyncError> {
    let Err(err) = std::fs::remove_dir(path) else {
        return Ok(());
    };
    let non_empty = std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if non_empty {
        return Err(SyncError::DirectoryNotEmpty {
            path: path.to_path_buf(),
        });
    }
    Err(io_err(path, err))
}
