//! # gradebox-sync
//!
//! Mirror one course's uploaded submissions into a local directory tree.
//!
//! Call [`sync_course`] to walk the remote course, download new or changed
//! attachments, and prune local files and directories no longer backed by
//! a remote attachment. Re-running with no remote changes does nothing.

pub mod error;
pub mod layout;
pub mod live;
pub mod pipeline;
pub mod planner;
pub mod prune;
pub mod writer;

pub use error::SyncError;
pub use layout::{AttachmentPaths, CourseLayout};
pub use live::LiveSet;
pub use pipeline::{sync_course, sync_course_at, SyncReport};
pub use prune::PruneOutcome;
pub use writer::AttachmentOutcome;
