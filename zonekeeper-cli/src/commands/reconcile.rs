//! The reconcile command: collect, classify, report, confirm, apply, export.

use std::sync::Arc;

use zonekeeper_aws::{AwsCredentials, Route53Client, ZoneStore};
use zonekeeper_core::config::{CleanupPolicy, Config};
use zonekeeper_core::services::{
    account_contexts, plan_batches, CollectorService, ExportService, MutationService,
    RecordClassifier,
};
use zonekeeper_core::{CoreError, Disposition, DispositionCounts};

use super::{print_collection_report, CliError, CliResult};
use crate::cli::ReconcileArgs;

pub async fn run_reconcile(config: &Config, args: &ReconcileArgs) -> CliResult<()> {
    let zone_id = args.zone.as_deref().unwrap_or(&config.zone.id);
    let zone_name = &config.zone.name;

    let credentials = AwsCredentials::from_env()?;
    let store: Arc<dyn ZoneStore> = Arc::new(Route53Client::new(credentials.clone()));
    let policy = CleanupPolicy::compile(&config.policy)?;

    // Collector and zone reader are independent; the collector tolerates
    // per-account failure, the zone read does not.
    let collector = CollectorService::new(account_contexts(&config.accounts, &credentials)?);
    let report = collector.collect().await;
    print_collection_report(&report);

    let zone = store
        .list_records(zone_id)
        .await
        .map_err(|e| CoreError::ZoneReadFailed {
            zone_id: zone_id.to_string(),
            source: e,
        })?;
    println!("\nZone '{zone_name}' ({zone_id}): {} record sets", zone.len());

    let classifier = RecordClassifier::new(&zone, &report.live, &policy);
    let dispositions = classifier.classify_all();
    print_dispositions(&dispositions);

    let counts = DispositionCounts::tally(&dispositions);
    println!(
        "\n{} records: {} keep, {} delete, {} skip",
        counts.total(),
        counts.keep,
        counts.delete,
        counts.skip
    );

    if !args.apply {
        println!("\nDry-run: no changes made. Re-run with --apply to delete.");
        return Ok(());
    }

    let batches = plan_batches(&dispositions, "zonekeeper cleanup");
    if batches.is_empty() {
        println!("\nNothing to delete.");
        return Ok(());
    }

    if !args.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete {} records from zone '{zone_name}' in {} batch(es)?",
                counts.delete,
                batches.len()
            ))
            .default(false)
            .interact()
            .map_err(|e| CliError::Interaction(e.to_string()))?;
        if !confirmed {
            println!("Aborted; no changes made.");
            return Ok(());
        }
    }

    let mutator = MutationService::new(Arc::clone(&store));
    let outcome = mutator.apply(zone_id, &batches).await?;
    println!(
        "\nDeleted {} records in {} batch(es); {} confirmed INSYNC",
        outcome.deleted_records, outcome.applied_batches, outcome.confirmed_batches
    );

    let exporter = ExportService::new(store);
    let paths = exporter
        .export(zone_id, zone_name, &config.export.dir)
        .await?;
    println!("Post-mutation export written to {}", paths.snapshot.display());

    Ok(())
}

fn print_dispositions(dispositions: &[Disposition]) {
    println!("\n{:<8} {:<42} {:<6} REASON", "VERDICT", "NAME", "TYPE");
    for d in dispositions {
        println!(
            "{:<8} {:<42} {:<6} {}",
            d.verdict.to_string(),
            d.record.name,
            d.record.record_type.to_string(),
            d.reason
        );
    }
}
