mod app;
mod domain;
mod error;
mod logging;
mod repo;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use time::UtcOffset;
use tracing::info;

use app::App;
use repo::memory::InMemoryTaskRepo;

#[derive(Parser, Debug)]
#[command(author, version, about = "jotter: in-memory task list TUI", long_about = None)]
struct Args {
    /// Tick interval of render loop in milliseconds
    #[arg(long, default_value_t = 120)]
    tick_ms: u64,

    /// Start with demo tasks
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Log file used when RUST_LOG is set (default: OS data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final task list as JSON on exit
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = logging::init(args.log_file.as_deref())? {
        info!(log_file = %path.display(), "logging enabled");
    }

    // Must run while the process is still single-threaded.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let repo = if args.demo {
        InMemoryTaskRepo::with_seed(seed_tasks())
    } else {
        InMemoryTaskRepo::default()
    };

    info!(demo = args.demo, "starting");
    let app = ui::run(App::new(repo, offset), Duration::from_millis(args.tick_ms))?;
    let snapshot = app.snapshot();
    info!(
        total = snapshot.stats.total,
        completed = snapshot.stats.completed,
        "exiting"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to encode task snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn seed_tasks() -> [&'static str; 3] {
    [
        "Draft release notes",
        "Check open pull requests",
        "Write documentation",
    ]
}
