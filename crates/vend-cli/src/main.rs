//! vend CLI
//!
//! Installs, updates, lists and locks the external sources declared in a
//! project's `vend.yml`.

mod cli;
mod commands;
mod console;
mod error;

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use vend_core::{Reporter, TracingReporter};

use cli::{Cli, Commands};
use console::ConsoleReporter;
use error::{CliError, Result};

/// Environment variable overriding the log filter, e.g. `VEND_LOG=vend_core=debug`.
const LOG_ENV: &str = "VEND_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet)?;

    // Verbose runs interleave reported lines with the log
    let reporter: Arc<dyn Reporter> = if cli.verbose > 0 {
        Arc::new(TracingReporter::new())
    } else {
        Arc::new(ConsoleReporter::new(cli.quiet))
    };

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.root, reporter),
        None => {
            println!("{} Synchronize external source dependencies", "vend".green().bold());
            println!();
            println!("Run {} for available commands.", "vend --help".cyan());
            Ok(())
        }
    }
}

fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to set up logging: {e}")))?;

    tracing::debug!(verbose, quiet, "Logging initialized");
    Ok(())
}

fn execute_command(cmd: Commands, root: &std::path::Path, reporter: Arc<dyn Reporter>) -> Result<()> {
    match cmd {
        Commands::Install {
            sync,
            fetch,
            skip_lock,
        } => commands::run_install(root, reporter, &sync, fetch, skip_lock),
        Commands::Update { sync, lock } => commands::run_update(root, reporter, &sync, lock),
        Commands::List { no_dirty } => commands::run_list(root, reporter, no_dirty),
        Commands::Lock { names } => commands::run_lock(root, reporter, &names),
        Commands::Uninstall { force } => commands::run_uninstall(root, reporter, force),
        Commands::Show { names, config } => commands::run_show(root, &names, config),
    }
}
