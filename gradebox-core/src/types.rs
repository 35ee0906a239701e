//! Domain types decoded from the LMS REST API.
//!
//! Records are transient: decoded fresh on every run and never persisted.
//! String fields the API may send as `null` decode as empty strings.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Submission type tag for file uploads.
pub const ONLINE_UPLOAD: &str = "online_upload";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a course. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(u64);

impl CourseId {
    pub fn new(raw: u64) -> Result<Self, ConfigError> {
        if raw == 0 {
            return Err(ConfigError::InvalidCourseId(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an assignment within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_code: String,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_types: Vec<String>,
    #[serde(default)]
    pub has_submitted_submissions: bool,
}

impl Assignment {
    /// Whether file uploads are among the accepted submission types.
    pub fn accepts_online_upload(&self) -> bool {
        self.submission_types.iter().any(|t| t == ONLINE_UPLOAD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_type: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

/// How a submission was turned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind<'a> {
    /// Nothing turned in yet.
    Empty,
    OnlineUpload,
    /// Any other tag (text entry, URL, media recording, ...).
    Other(&'a str),
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind<'_> {
        match self.submission_type.as_str() {
            "" => SubmissionKind::Empty,
            ONLINE_UPLOAD => SubmissionKind::OnlineUpload,
            other => SubmissionKind::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub login_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl User {
    /// `login:name` — used for progress lines and the per-user directory.
    ///
    /// The colon is never touched by [`crate::NameNormalizer`].
    pub fn label(&self) -> String {
        format!("{}:{}", self.login_id, self.name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Course phase
// ---------------------------------------------------------------------------

/// Where `now` falls relative to the course's start and end. Informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoursePhase {
    NotStarted { starts_in: Duration },
    InProgress { ends_in: Option<Duration> },
    Ended,
}

impl Course {
    /// A missing start counts as started; a missing end as open-ended.
    pub fn phase(&self, now: DateTime<Utc>) -> CoursePhase {
        if let Some(start) = self.start_at {
            if now < start {
                return CoursePhase::NotStarted {
                    starts_in: start - now,
                };
            }
        }
        match self.end_at {
            Some(end) if now < end => CoursePhase::InProgress {
                ends_in: Some(end - now),
            },
            Some(_) => CoursePhase::Ended,
            None => CoursePhase::InProgress { ends_in: None },
        }
    }
}

impl fmt::Display for CoursePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoursePhase::NotStarted { starts_in } => {
                write!(f, "starts in {}", format_seconds(starts_in.num_seconds()))
            }
            CoursePhase::InProgress { ends_in: Some(d) } => {
                write!(f, "ends in {}", format_seconds(d.num_seconds()))
            }
            CoursePhase::InProgress { ends_in: None } => write!(f, "in progress"),
            CoursePhase::Ended => write!(f, "course has ended"),
        }
    }
}

fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
