//! Error types for gradebox-sync.

use std::path::PathBuf;

use thiserror::Error;

use gradebox_fetch::FetchError;

/// All errors that can arise from a sync run. Every one is fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport, protocol or decode failure talking to the API.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Downloaded body length differs from the declared attachment size.
    #[error("download size of {actual} did not match expected size of {expected} for {path}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory scheduled for removal still has entries.
    #[error("refusing to remove non-empty directory {path}")]
    DirectoryNotEmpty { path: PathBuf },

    #[error("walking {path} looking for files to delete: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
