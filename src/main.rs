#![allow(dead_code)]
#[macro_use]
mod console;
mod btree;
mod command;
mod cursor;
mod errors;
mod meta;
mod node;
mod pager;
mod repl;
mod row;
mod statement;
mod table;

use clap::Parser;
use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use errors::Error;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = NAME, version = VERSION, about = "Tiny embedded key-value store.")]
struct Cli {
    /// Path to the database file. Created if it does not already exist.
    #[arg(default_value = "db")]
    db_filename: String,
}

fn main() -> ExitCode {
    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(format!("{NAME}.log"))
        .expect("failed to open log file");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut table = match table::Table::open(&cli.db_filename) {
        Ok(t) => t,
        Err(e) => {
            println!("Error opening DB file: {e}");
            return ExitCode::FAILURE;
        }
    };

    match repl::run(&mut table) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::Interrupted => ExitCode::SUCCESS,
        Err(e) => {
            println!("\nError: {e}");
            ExitCode::FAILURE
        }
    }
}
