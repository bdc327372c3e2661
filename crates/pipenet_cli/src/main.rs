//! Interactive console entry point.
//!
//! # Responsibility
//! - Map command-line flags onto core logging and storage settings.
//! - Run the menu shell over stdin/stdout.

use clap::Parser;
use log::error;
use pipenet_core::{default_log_level, init_logging, ConsolePrompter, RecordStore, Shell};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Pipeline segment and compressor station record manager.
#[derive(Parser, Debug)]
#[command(name = "pipenet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory where `<name>.txt` save files are read and written
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory for rolling log files (default: `<data-dir>/logs`)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    log_level: Option<String>,

    /// Disable file logging
    #[arg(long)]
    no_log: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.no_log {
        if let Err(err) = start_logging(&cli) {
            eprintln!("pipenet: {err}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = io::stdin();
    let prompter = ConsolePrompter::new(stdin.lock(), io::stdout());
    let mut shell = Shell::new(
        RecordStore::new(),
        cli.data_dir,
        prompter,
        io::stdout(),
    );

    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=shell_abort module=cli status=error error={err}");
            eprintln!("pipenet: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(cli: &Cli) -> Result<(), String> {
    let log_dir = match &cli.log_dir {
        Some(dir) => absolute(dir)?,
        None => absolute(&cli.data_dir)?.join("logs"),
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy()).map_err(|err| err.to_string())
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|err| format!("{}: {err}", path.display()))
}
