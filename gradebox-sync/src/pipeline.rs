//! Sync pipeline entrypoint used by the CLI.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use gradebox_core::{Course, CoursePhase, SyncConfig};
use gradebox_fetch::{CanvasApi, Fetcher};

use crate::error::SyncError;
use crate::layout::CourseLayout;
use crate::planner::{self, Plan};
use crate::prune::{self, PruneOutcome};
use crate::writer::AttachmentOutcome;

/// Outcome of syncing one course.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub course: Course,
    pub phase: CoursePhase,
    pub course_root: PathBuf,
    pub dry_run: bool,
    pub attachments: Vec<AttachmentOutcome>,
    pub pruned: Vec<PruneOutcome>,
    pub skipped_assignments: usize,
    pub filtered_submissions: usize,
}

impl SyncReport {
    /// Attachments fetched, or that would be fetched in a dry run.
    pub fn downloads(&self) -> usize {
        self.attachments
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    AttachmentOutcome::Downloaded { .. } | AttachmentOutcome::WouldDownload { .. }
                )
            })
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.attachments
            .iter()
            .filter(|o| matches!(o, AttachmentOutcome::Unchanged { .. }))
            .count()
    }

    /// Paths removed, or that would be removed in a dry run.
    pub fn deletions(&self) -> usize {
        self.pruned.len()
    }

    pub fn is_noop(&self) -> bool {
        self.downloads() == 0 && self.deletions() == 0
    }
}

/// Sync one course against the current time.
pub fn sync_course<F: Fetcher>(
    api: &CanvasApi<F>,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    sync_course_at(api, config, Utc::now())
}

/// Sync one course; `now` only feeds the informational course phase.
pub fn sync_course_at<F: Fetcher>(
    api: &CanvasApi<F>,
    config: &SyncConfig,
    now: DateTime<Utc>,
) -> Result<SyncReport, SyncError> {
    let course = api.course(config.course_id)?;
    let phase = course.phase(now);
    match phase {
        CoursePhase::NotStarted { .. } => tracing::info!("{} ({phase})", course.course_code),
        _ => tracing::info!("{} ({phase})", course.name),
    }

    let layout = CourseLayout::new(&config.dir, &course, config.normalizer);
    let Plan {
        live,
        attachments,
        skipped_assignments,
        filtered_submissions,
    } = planner::plan_course(api, config, &course, &layout)?;

    let pruned = prune::prune(layout.root(), &live, config.dry_run)?;

    Ok(SyncReport {
        course_root: layout.root().to_path_buf(),
        course,
        phase,
        dry_run: config.dry_run,
        attachments,
        pruned,
        skipped_assignments,
        filtered_submissions,
    })
}
