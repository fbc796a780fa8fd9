//! Standalone zone export.

use std::sync::Arc;

use zonekeeper_aws::{AwsCredentials, Route53Client, ZoneStore};
use zonekeeper_core::config::Config;
use zonekeeper_core::services::ExportService;

use super::CliResult;
use crate::cli::ExportArgs;

pub async fn run_export(config: &Config, args: &ExportArgs) -> CliResult<()> {
    let credentials = AwsCredentials::from_env()?;
    let store: Arc<dyn ZoneStore> = Arc::new(Route53Client::new(credentials));

    let out_dir = args.out.as_deref().unwrap_or(&config.export.dir);
    let exporter = ExportService::new(store);
    let paths = exporter
        .export(&config.zone.id, &config.zone.name, out_dir)
        .await?;

    println!("Snapshot:       {}", paths.snapshot.display());
    println!("Zone file:      {}", paths.zone_file.display());
    println!("Manual records: {}", paths.manual_records.display());
    Ok(())
}
