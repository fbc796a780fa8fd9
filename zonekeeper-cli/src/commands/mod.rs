//! Command implementations.

mod accounts;
mod export;
mod reconcile;

pub use accounts::run_accounts;
pub use export::run_export;
pub use reconcile::run_reconcile;

use thiserror::Error;

use zonekeeper_core::{CollectionReport, CoreError};

/// CLI-level error: core errors plus interaction failures.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("{0}")]
    Aws(#[from] zonekeeper_aws::AwsError),

    #[error("Interaction error: {0}")]
    Interaction(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Print the per-account collection outcomes.
pub(crate) fn print_collection_report(report: &CollectionReport) {
    println!("Accounts:");
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(count) => println!("  {:<20} ok ({count} distributions)", outcome.account),
            Err(message) => println!("  {:<20} FAILED: {message}", outcome.account),
        }
    }
    if report.failed_accounts() > 0 {
        println!(
            "  ({} of {} accounts unreachable; their endpoints are invisible this run)",
            report.failed_accounts(),
            report.outcomes.len()
        );
    }
    println!(
        "Live endpoints: {} CDN domains, {} configured aliases",
        report.live.cdn_domains.len(),
        report.live.configured_aliases.len()
    );
}
