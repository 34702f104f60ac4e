/// Main entry point for the habit tracker core
///
/// Sets up logging, resolves the database location, runs the startup
/// rollover catch-up, starts the midnight scheduler, and serves the UI
/// command protocol over stdin/stdout until the UI side closes the pipe.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_ledger::{CommandServer, HabitTracker};

/// Pick a writable default location for the database
fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or(std::env::current_dir()?);

    let dir = base.join("habit-ledger");
    std::fs::create_dir_all(&dir)?;

    Ok(dir.join("habits.db"))
}

/// Command line arguments for the habit tracker core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's data directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // Logs go to stderr; stdout carries the command protocol
    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_ledger={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit tracker core");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let tracker = HabitTracker::open(db_path)?;

    // Backfill any midnight crossed while the app was closed
    if let Some(logged) = tracker.catch_up().await? {
        info!("Startup catch-up logged {} missed habits", logged);
    }

    // The in-process midnight timer runs for the life of the server
    let scheduler = tracker.start_scheduler();

    let server = CommandServer::new(tracker);
    server.run().await?;

    scheduler.shutdown().await;
    info!("Habit tracker core shutdown complete");
    Ok(())
}
