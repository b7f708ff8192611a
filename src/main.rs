//! Inventory Manager
//!
//! Imports the inventory CSV on startup, reports any rows that could not be
//! imported, then runs the interactive menu.

use clap::Parser;
use inventory_manager::{import_csv_file, open_database, ImportReport, Menu};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Console inventory manager - imports a product CSV into SQLite
#[derive(Parser, Debug)]
#[command(name = "inventory_manager")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    database: PathBuf,

    /// Inventory CSV to import on startup
    #[arg(short, long, default_value = "inventory.csv")]
    csv: PathBuf,

    /// Default destination for inventory back-ups
    #[arg(short, long, default_value = "backup.csv")]
    backup: PathBuf,

    /// Start the menu without importing the CSV
    #[arg(long, default_value_t = false)]
    skip_import: bool,
}

fn main() {
    // Set RUST_LOG to see pipeline detail, e.g. RUST_LOG=info or RUST_LOG=inventory_manager=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut conn = match open_database(&args.database) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to open database {}: {}", args.database.display(), e);
            eprintln!("Error: failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let import = if args.skip_import {
        Ok(ImportReport::default())
    } else {
        import_csv_file(&mut conn, &args.csv)
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let interactive = stdout.is_terminal();
    let mut menu = Menu::new(&mut conn, stdin.lock(), stdout.lock(), args.backup)
        .with_clear_screen(interactive);

    // A missing or unreadable CSV still leaves the existing inventory usable
    let reported = match &import {
        Ok(report) => menu.report_import_errors(report),
        Err(e) => {
            log::error!("Failed to import {}: {}", args.csv.display(), e);
            menu.report_import_failure(&args.csv, e)
        }
    };
    let result = reported.and_then(|()| menu.run());
    if let Err(e) = result {
        log::error!("Console error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
