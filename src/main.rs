use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use mac_sweeper::cli::Cli;
use mac_sweeper::commands::{self, Session};
use mac_sweeper::config::Config;
use mac_sweeper::{menu, system};

/// Exit status when at least one requested operation failed.
const EXIT_OPERATION_FAILED: u8 = 5;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "mac-sweeper", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet, cli.log.as_deref())?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Loaded configuration");

    let home = system::home_dir().context("Cannot determine the home directory")?;
    let operations = cli.requested_operations(&config);
    let flags = cli.run_flags(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(config, home, flags, stdin.lock(), stdout.lock());

    if operations.is_empty() {
        tracing::info!("Starting interactive menu");
        menu::run(&mut session)?;
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!(?operations, "Running requested operations");
    let failures = commands::execute_all(&operations, &mut session)?;

    if failures > 0 {
        tracing::warn!(failures, "Some operations failed");
        return Ok(ExitCode::from(EXIT_OPERATION_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mac_sweeper={}", level)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new("mac_sweeper=info")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .with(file_layer)
        .init();

    Ok(())
}
