//! Per-attachment download with timestamp-gated skipping.
//!
//! ## `sync_attachment`
//!
//! 1. Stat the local file.
//! 2. Same size and same mtime (to the second) as the remote → unchanged.
//! 3. Dry run → report only.
//! 4. Download; the body length must equal the declared size.
//! 5. Write to a `.gradebox-*` temp file in the same directory, stamp
//!    atime/mtime with the remote modification time.
//! 6. Rename to the final path.
//!
//! Step 5 is what makes the next run see step 2 succeed.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use filetime::FileTime;
use tempfile::Builder;

use gradebox_core::Attachment;
use gradebox_fetch::{CanvasApi, Fetcher};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What happened to one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Local copy matches size and modification time.
    Unchanged { path: PathBuf },
    /// Fetched and written.
    Downloaded { path: PathBuf, size: u64 },
    /// Dry run: would have been fetched and written.
    WouldDownload { path: PathBuf, size: u64 },
}

impl AttachmentOutcome {
    pub fn path(&self) -> &Path {
        match self {
            AttachmentOutcome::Unchanged { path }
            | AttachmentOutcome::Downloaded { path, .. }
            | AttachmentOutcome::WouldDownload { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// sync_attachment
// ---------------------------------------------------------------------------

/// Bring `path` in line with `attachment`.
pub fn sync_attachment<F: Fetcher>(
    api: &CanvasApi<F>,
    attachment: &Attachment,
    path: &Path,
    dry_run: bool,
) -> Result<AttachmentOutcome, SyncError> {
    if is_unchanged(path, attachment) {
        tracing::debug!("        (unchanged) {}", attachment.filename);
        return Ok(AttachmentOutcome::Unchanged {
            path: path.to_path_buf(),
        });
    }

    let modified = attachment.modified_at.with_timezone(&Local);
    if dry_run {
        tracing::info!(
            "        need to download {} (size {}) modified at {}",
            attachment.filename,
            attachment.size,
            modified
        );
        return Ok(AttachmentOutcome::WouldDownload {
            path: path.to_path_buf(),
            size: attachment.size,
        });
    }

    tracing::info!(
        "        downloading {} (size {}) modified at {}",
        attachment.filename,
        attachment.size,
        modified
    );
    let data = api.download(attachment)?;
    let actual = data.len() as u64;
    if actual != attachment.size {
        tracing::warn!("while downloading {}", attachment.url);
        return Err(SyncError::SizeMismatch {
            path: path.to_path_buf(),
            expected: attachment.size,
            actual,
        });
    }

    write_stamped(path, &data, attachment.modified_at)?;
    Ok(AttachmentOutcome::Downloaded {
        path: path.to_path_buf(),
        size: attachment.size,
    })
}

/// Whether the file at `path` already matches `attachment`.
///
/// Only size and modification time are compared; content is never hashed.
/// A failed stat means "changed": the write that follows reports the real
/// error, and a dry run just lists the download.
pub fn is_unchanged(path: &Path, attachment: &Attachment) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() || meta.len() != attachment.size {
        return false;
    }
    let local = FileTime::from_last_modification_time(&meta);
    round_to_second(local.unix_seconds(), local.nanoseconds())
        == round_to_second(
            attachment.modified_at.timestamp(),
            attachment.modified_at.timestamp_subsec_nanos(),
        )
}

/// Prefix of in-flight download files. Random suffix, never a live name.
pub(crate) const TEMP_PREFIX: &str = ".gradebox-";

/// Write `data` to `path` with both timestamps set to `modified_at`.
///
/// Goes through a uniquely named temp file beside `path` and a rename, so
/// `path` is either the old file or the complete new one, and no other
/// file in the directory is touched. The temp file is removed on failure.
pub(crate) fn write_stamped(
    path: &Path,
    data: &[u8],
    modified_at: DateTime<Utc>,
) -> Result<(), SyncError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;

    let mut tmp = Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .map_err(|e| io_err(parent, e))?;
    tmp.write_all(data).map_err(|e| io_err(tmp.path(), e))?;

    let stamp = FileTime::from_unix_time(
        modified_at.timestamp(),
        modified_at.timestamp_subsec_nanos(),
    );
    filetime::set_file_handle_times(tmp.as_file(), Some(stamp), Some(stamp))
        .map_err(|e| io_err(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| io_err(path, e.error))?;
    Ok(())
}

fn round_to_second(seconds: i64, nanos: u32) -> i64 {
    if nanos >= 500_000_000 {
        seconds + 1
    } else {
        seconds
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;

    use chrono::TimeZone;
    use gradebox_fetch::FetchError;
    use tempfile::TempDir;

    struct OneFile {
        body: Vec<u8>,
        calls: Cell<usize>,
    }

    impl OneFile {
        fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                calls: Cell::new(0),
            }
        }
    }

    impl Fetcher for OneFile {
        fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
            panic!("unexpected JSON request to {url}");
        }

        fn get_bytes(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.clone())
        }
    }

    fn attachment(size: u64, modified_at: DateTime<Utc>) -> Attachment {
        Attachment {
            id: 1,
            display_name: "main.c".into(),
            filename: "main.c".into(),
            size,
            modified_at,
            url: "https://lms.example/files/1/download".into(),
        }
    }

    fn remote_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 5, 6, 7, 8).unwrap()
    }

    #[test]
    fn download_writes_file_and_stamps_mtime() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Lab").join("al:Al").join("main.c");
        let api = CanvasApi::new("https://lms.example", OneFile::new(b"int main;"));

        let out = sync_attachment(&api, &attachment(9, remote_time()), &path, false).unwrap();
        assert!(matches!(out, AttachmentOutcome::Downloaded { size: 9, .. }));

        // Inspect times before reading: a read may bump atime under relatime.
        let meta = fs::metadata(&path).unwrap();
        let mtime = FileTime::from_last_modification_time(&meta);
        assert_eq!(mtime.unix_seconds(), remote_time().timestamp());
        let atime = FileTime::from_last_access_time(&meta);
        assert_eq!(atime.unix_seconds(), remote_time().timestamp());

        assert_eq!(fs::read(&path).unwrap(), b"int main;");
    }

    #[test]
    fn second_pass_is_unchanged_without_fetching() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("main.c");
        let fetcher = OneFile::new(b"abc");
        let api = CanvasApi::new("https://lms.example", &fetcher);
        let att = attachment(3, remote_time());

        sync_attachment(&api, &att, &path, false).unwrap();
        let again = sync_attachment(&api, &att, &path, false).unwrap();
        assert!(matches!(again, AttachmentOutcome::Unchanged { .. }));
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn unchanged_compares_at_one_second_granularity() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f");
        fs::write(&path, b"abc").unwrap();
        let local = FileTime::from_unix_time(remote_time().timestamp(), 200_000_000);
        filetime::set_file_mtime(&path, local).unwrap();

        assert!(is_unchanged(&path, &attachment(3, remote_time())));
    }

    #[test]
    fn size_or_mtime_difference_means_changed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f");
        fs::write(&path, b"abc").unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(remote_time().timestamp(), 0))
            .unwrap();

        assert!(!is_unchanged(&path, &attachment(4, remote_time())));
        let later = remote_time() + chrono::Duration::seconds(2);
        assert!(!is_unchanged(&path, &attachment(3, later)));
        assert!(!is_unchanged(&tmp.path().join("missing"), &attachment(3, remote_time())));
    }

    #[test]
    fn content_change_with_same_size_and_time_goes_unnoticed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("main.c");
        let api = CanvasApi::new("https://lms.example", OneFile::new(b"new"));
        write_stamped(&path, b"old", remote_time()).unwrap();

        let out = sync_attachment(&api, &attachment(3, remote_time()), &path, false).unwrap();
        assert!(matches!(out, AttachmentOutcome::Unchanged { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn dry_run_reports_without_touching_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Lab").join("main.c");
        let fetcher = OneFile::new(b"abc");
        let api = CanvasApi::new("https://lms.example", &fetcher);

        let out = sync_attachment(&api, &attachment(3, remote_time()), &path, true).unwrap();
        assert!(matches!(out, AttachmentOutcome::WouldDownload { size: 3, .. }));
        assert!(!tmp.path().join("Lab").exists(), "dry-run must not create dirs");
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn size_mismatch_never_reaches_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Lab").join("main.c");
        let api = CanvasApi::new("https://lms.example", OneFile::new(b"trunc"));

        let err = sync_attachment(&api, &attachment(100, remote_time()), &path, false)
            .expect_err("short body must fail");
        match err {
            SyncError::SizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 100);
                assert_eq!(actual, 5);
            }
            other => panic!("expected size mismatch, got {other:?}"),
        }
        assert!(!tmp.path().join("Lab").exists());
    }

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(TEMP_PREFIX))
            })
            .collect()
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.txt");
        write_stamped(&path, b"data", remote_time()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(leftover_temp_files(tmp.path()).is_empty());
    }

    #[test]
    fn sibling_named_like_a_temp_suffix_survives() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("alice");
        let sibling = dir.join("x.gradebox.tmp");
        let target = dir.join("x");

        let api = CanvasApi::new("https://lms.example", OneFile::new(b"keep"));
        sync_attachment(&api, &attachment(4, remote_time()), &sibling, false).unwrap();
        let api = CanvasApi::new("https://lms.example", OneFile::new(b"hi"));
        sync_attachment(&api, &attachment(2, remote_time()), &target, false).unwrap();

        assert_eq!(fs::read(&sibling).unwrap(), b"keep");
        assert_eq!(fs::read(&target).unwrap(), b"hi");
    }

    #[test]
    fn failed_rename_leaves_target_and_cleans_tmp() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file, even as root.
        let path = tmp.path().join("occupied");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("inner.txt"), "original").unwrap();

        let result = write_stamped(&path, b"new content", remote_time());

        assert!(result.is_err());
        assert!(path.is_dir());
        assert_eq!(fs::read_to_string(path.join("inner.txt")).unwrap(), "original");
        assert!(leftover_temp_files(tmp.path()).is_empty());
    }

    #[test]
    fn unreadable_path_counts_as_changed() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("Lab_1");
        fs::write(&blocker, "not a dir").unwrap();
        assert!(!is_unchanged(&blocker.join("main.c"), &attachment(3, remote_time())));
    }
}
