//! Walk the remote course and bring every wanted attachment up to date.
//!
//! Course → assignments (listing order) → submissions → attachments. Every
//! attachment of a matching online-upload submission is registered in the
//! [`LiveSet`] before any download is attempted, so live membership reflects
//! desired state rather than what this run happened to fetch.

use chrono::Local;

use gradebox_core::{Assignment, Course, Submission, SubmissionKind, SyncConfig};
use gradebox_fetch::{CanvasApi, Fetcher};

use crate::error::SyncError;
use crate::layout::CourseLayout;
use crate::live::LiveSet;
use crate::writer::{self, AttachmentOutcome};

/// Why an assignment's submissions were never fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSkip {
    UploadsDisabled,
    NoSubmissions,
}

impl AssignmentSkip {
    fn reason(self) -> &'static str {
        match self {
            AssignmentSkip::UploadsDisabled => "online uploads not enabled",
            AssignmentSkip::NoSubmissions => "online uploads enabled, but no submissions",
        }
    }
}

/// Result of walking the remote course.
#[derive(Debug, Clone)]
pub struct Plan {
    pub live: LiveSet,
    pub attachments: Vec<AttachmentOutcome>,
    pub skipped_assignments: usize,
    pub filtered_submissions: usize,
}

/// Decide whether an assignment's submissions are worth fetching.
pub fn assignment_skip(assignment: &Assignment) -> Option<AssignmentSkip> {
    if !assignment.accepts_online_upload() {
        return Some(AssignmentSkip::UploadsDisabled);
    }
    if !assignment.has_submitted_submissions {
        return Some(AssignmentSkip::NoSubmissions);
    }
    None
}

/// Walk every assignment of `course`, downloading or reporting attachments.
pub fn plan_course<F: Fetcher>(
    api: &CanvasApi<F>,
    config: &SyncConfig,
    course: &Course,
    layout: &CourseLayout,
) -> Result<Plan, SyncError> {
    let mut plan = Plan {
        live: LiveSet::new(layout.root()),
        attachments: Vec::new(),
        skipped_assignments: 0,
        filtered_submissions: 0,
    };

    let assignments = api.assignments(config.course_id)?;
    tracing::debug!("{}: {} assignment(s)", course.name, assignments.len());

    for assignment in &assignments {
        let mut header = format!("==> {}", assignment.name);
        if !assignment.published {
            header.push_str(" (unpublished)");
        }
        if let Some(skip) = assignment_skip(assignment) {
            tracing::info!("{header} ({})", skip.reason());
            plan.skipped_assignments += 1;
            continue;
        }
        tracing::info!("{header}");

        let submissions = api.submissions(config.course_id, assignment.id)?;
        for submission in &submissions {
            plan_submission(api, config, layout, assignment, submission, &mut plan)?;
        }
    }

    Ok(plan)
}

fn plan_submission<F: Fetcher>(
    api: &CanvasApi<F>,
    config: &SyncConfig,
    layout: &CourseLayout,
    assignment: &Assignment,
    submission: &Submission,
    plan: &mut Plan,
) -> Result<(), SyncError> {
    let who = submission.user.label();
    if let Some(term) = config.filter.first_mismatch(assignment, &submission.user) {
        tracing::info!("    {who} does not match filter term {term:?}");
        plan.filtered_submissions += 1;
        return Ok(());
    }

    match submission.kind() {
        SubmissionKind::Empty => {
            tracing::info!("    {who} has no submission");
        }
        SubmissionKind::Other(kind) => {
            tracing::info!("    {who} has submission of type {kind} (skipping)");
        }
        SubmissionKind::OnlineUpload => {
            match submission.submitted_at {
                Some(at) => tracing::info!("    {who} submitted at {}", at.with_timezone(&Local)),
                None => tracing::info!("    {who} submitted"),
            }
            for attachment in &submission.attachments {
                let paths = layout.attachment(assignment, &submission.user, attachment);
                plan.live.register(&paths);
                let outcome =
                    writer::sync_attachment(api, attachment, &paths.file, config.dry_run)?;
                plan.attachments.push(outcome);
            }
        }
    }
    Ok(())
}
