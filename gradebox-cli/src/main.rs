//! Gradebox — mirror a course's uploaded submissions into a local directory.
//!
//! # Usage
//!
//! ```text
//! CANVAS_TOKEN=... gradebox --course <ID> [--dir <DIR>] [--dry] [--despace false] [TERMS]...
//! ```
//!
//! With filter terms, a submission is only synced if every term is a
//! case-insensitive substring of the assignment name or description, or of
//! the student's login, name, short name or email.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gradebox",
    version,
    about = "Mirror student submissions for one course into a local directory",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,

    /// Also log unchanged files and request URLs.
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.sync.run()
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "info,gradebox_core=debug,gradebox_fetch=debug,gradebox_sync=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
