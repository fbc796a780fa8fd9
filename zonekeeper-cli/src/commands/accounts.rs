//! Account reachability probe.

use zonekeeper_aws::AwsCredentials;
use zonekeeper_core::config::Config;
use zonekeeper_core::services::{account_contexts, CollectorService};

use super::{print_collection_report, CliResult};

pub async fn run_accounts(config: &Config) -> CliResult<()> {
    if config.accounts.is_empty() {
        println!("No accounts configured.");
        return Ok(());
    }

    let credentials = AwsCredentials::from_env()?;
    let collector = CollectorService::new(account_contexts(&config.accounts, &credentials)?);
    let report = collector.collect().await;
    print_collection_report(&report);
    Ok(())
}
