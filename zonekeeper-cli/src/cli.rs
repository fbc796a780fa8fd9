//! Clap derive structures for the `zonekeeper` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zonekeeper -- shared-zone DNS cleanup across an AWS organization
#[derive(Debug, Parser)]
#[command(
    name = "zonekeeper",
    version,
    about = "Reconcile a shared Route 53 zone against live CDN endpoints",
    long_about = "Classifies every record of the shared zone as KEEP, DELETE or SKIP\n\
        by cross-referencing the live CDN distributions of every member\n\
        account, then deletes confirmed orphans in bounded batches.\n\n\
        Management-account credentials come from AWS_ACCESS_KEY_ID /\n\
        AWS_SECRET_ACCESS_KEY (and optionally AWS_SESSION_TOKEN).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(
        long,
        short = 'c',
        env = "ZONEKEEPER_CONFIG",
        default_value = "zonekeeper.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every zone record and delete confirmed orphans
    Reconcile(ReconcileArgs),

    /// Fetch the zone and write the export files
    Export(ExportArgs),

    /// Probe every configured account context and report reachability
    Accounts,
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Apply the deletions (without this flag the run is a dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Hosted zone id, overriding the config file
    #[arg(long)]
    pub zone: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output directory, overriding the config file
    #[arg(long)]
    pub out: Option<PathBuf>,
}
