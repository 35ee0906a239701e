//! `gradebox` — sync one course's submissions into `--dir`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use colored::Colorize;

use gradebox_core::{
    ApiConfig, CourseId, Credentials, NameNormalizer, SubmissionFilter, SyncConfig,
    DEFAULT_ENDPOINT, ENDPOINT_ENV,
};
use gradebox_fetch::{CanvasApi, HttpFetcher};
use gradebox_sync::{sync_course, AttachmentOutcome, PruneOutcome, SyncReport};

/// Arguments for a sync run.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Course ID (required).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub course: u64,

    /// Directory to download into.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Show what would be downloaded and deleted without changing anything.
    #[arg(long, visible_alias = "dry-run")]
    pub dry: bool,

    /// Convert spaces in file and directory names to underscores.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub despace: bool,

    /// Base URL of the LMS.
    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Only sync submissions matching every term (case-insensitive substring
    /// of assignment name/description or student login/name/short name/email).
    pub terms: Vec<String>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let credentials = Credentials::from_env().context("cannot authenticate")?;
        let course_id = CourseId::new(self.course)?;
        let api_config = ApiConfig::new(self.endpoint, credentials);

        let config = SyncConfig {
            course_id,
            dir: self.dir,
            dry_run: self.dry,
            normalizer: NameNormalizer::new(self.despace),
            filter: SubmissionFilter::new(&self.terms),
        };

        let api = CanvasApi::new(
            api_config.endpoint.as_str(),
            HttpFetcher::new(&api_config.credentials),
        );
        let report = sync_course(&api, &config)
            .with_context(|| format!("sync failed for course {course_id}"))?;
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let root = report.course_root.display();

    if report.is_noop() {
        println!(
            "{prefix}✓ '{}' — nothing to do ({} unchanged in {root})",
            report.course.course_code,
            report.unchanged()
        );
        return;
    }

    let (download_verb, delete_verb) = if report.dry_run {
        ("to download", "to delete")
    } else {
        ("downloaded", "deleted")
    };
    println!(
        "{prefix}✓ '{}' synced into {root} ({} {download_verb}, {} unchanged, {} {delete_verb})",
        report.course.course_code,
        report.downloads(),
        report.unchanged(),
        report.deletions(),
    );

    for outcome in &report.attachments {
        match outcome {
            AttachmentOutcome::Downloaded { path, size } => {
                println!("  {}  {} ({size} bytes)", "✎".green(), path.display())
            }
            AttachmentOutcome::WouldDownload { path, size } => {
                println!("  {}  {} ({size} bytes)", "~".yellow(), path.display())
            }
            AttachmentOutcome::Unchanged { .. } => {}
        }
    }
    for outcome in &report.pruned {
        match outcome {
            PruneOutcome::DeletedFile { path } | PruneOutcome::DeletedDir { path } => {
                println!("  {}  {}", "✗".red(), path.display())
            }
            PruneOutcome::WouldDeleteFile { path } | PruneOutcome::WouldDeleteDir { path } => {
                println!("  {}  {}", "-".yellow(), path.display())
            }
        }
    }
}
