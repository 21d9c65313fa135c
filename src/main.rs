use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::db::connection::{init_db, Database};
use crate::errors::SyncError;

mod db;
mod domain;
mod errors;
mod ingest;
mod reports;
mod sync;

#[cfg(test)]
mod tests;

/// Sync the local listing store with the periodic marketplace export.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the SQLite listing store
    #[arg(long, default_value = "db/listings.sqlite3")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest the delivered export and reconcile it against the store
    Sync {
        /// Directory the export file is delivered into (exactly one file)
        #[arg(long, default_value = "input_data")]
        input_dir: PathBuf,
    },
    /// Write the price-revision upload file
    Revise {
        #[arg(long, default_value = "revise_super_price.csv")]
        output: PathBuf,
    },
    /// Clear the closed flag on every listing
    ResetClosed,
    /// Clear the change bitmask on every listing
    ResetChanges,
}

fn run(cli: Cli, db: &Database) -> Result<(), SyncError> {
    match cli.command {
        Command::Sync { input_dir } => {
            let outcome = sync::run_sync(db, &input_dir)?;
            println!(
                "✅ Sync done: {} created, {} updated, {} closed, {} rejected",
                outcome.created,
                outcome.updated,
                outcome.closed,
                outcome.rejected.len()
            );
        }
        Command::Revise { output } => {
            let count = reports::export_revise_csv(db, &output)?;
            println!("✅ Wrote {count} revision rows to {}", output.display());
        }
        Command::ResetClosed => {
            let count = db.with_conn(|conn| db::listings::reset_all_closed(conn))?;
            println!("✅ Cleared closed flag on {count} listings");
        }
        Command::ResetChanges => {
            let count = db.with_conn(|conn| db::listings::reset_all_changes(conn))?;
            println!("✅ Cleared change bitmask on {count} listings");
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedsync=info")),
        )
        .init();

    let cli = Cli::parse();

    // the default store lives under db/
    if let Some(parent) = std::path::Path::new(&cli.db).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("❌ Cannot create store directory: {e}");
                std::process::exit(1);
            }
        }
    }

    let db = Database::new(cli.db.clone());
    if let Err(e) = init_db(&db) {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli, &db) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
