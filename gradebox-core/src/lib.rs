//! Gradebox core library — domain types, naming and filtering rules, config.
//!
//! - [`types`] — course, assignment, submission, attachment, user records
//! - [`normalize`] — remote name → filesystem path segment
//! - [`filter`] — operator match terms over submissions
//! - [`config`] — run configuration built once by the binary
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod types;

pub use config::{ApiConfig, Credentials, SyncConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV, TOKEN_ENV};
pub use error::ConfigError;
pub use filter::SubmissionFilter;
pub use normalize::NameNormalizer;
pub use types::{
    Assignment, AssignmentId, Attachment, Course, CourseId, CoursePhase, Submission,
    SubmissionKind, User,
};
