use clap::Parser;
use expense_tracker::backend::domain::{LoadStatus, CORRUPT_BACKUP_KEY};
use expense_tracker::backend::io::{execute, Cli, Command};
use expense_tracker::initialize_backend;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("Starting Expense Tracker");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut app_state = initialize_backend(cli.data_dir)?;

    let store = &app_state.expense_store;
    if store.load_status() == LoadStatus::Recovered {
        if store.is_write_protected() {
            eprintln!(
                "Warning: saved expenses could not be read or backed up. \
                 Changes will not be saved until the data directory is fixed."
            );
        } else {
            eprintln!(
                "Warning: saved expenses could not be read; starting with an empty list. \
                 The unreadable data was kept under '{}'.",
                CORRUPT_BACKUP_KEY
            );
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&mut app_state, cli.command.unwrap_or(Command::List), &mut out)
}
