//! zonekeeper CLI entry point.
//!
//! Logging goes to stderr so stdout stays clean for the disposition report
//! and export paths.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command, GlobalOpts};
use commands::{run_accounts, run_export, run_reconcile, CliResult};
use zonekeeper_core::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> CliResult<()> {
    let config = Config::load(&cli.global.config)?;

    match &cli.command {
        Command::Reconcile(args) => run_reconcile(&config, args).await,
        Command::Export(args) => run_export(&config, args).await,
        Command::Accounts => run_accounts(&config).await,
    }
}

fn init_tracing(opts: &GlobalOpts) {
    let level = if opts.quiet {
        tracing::Level::ERROR
    } else {
        match opts.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
