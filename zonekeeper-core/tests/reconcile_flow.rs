#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end reconciliation flow over mock AWS seams: collect, classify,
//! plan, apply, export.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use zonekeeper_aws::{
    AliasTarget, AwsError, ChangeBatch, ChangeInfo, ChangeStatus, DistributionSource,
    DistributionSummary, RecordType, ZoneRecord, ZoneStore,
};
use zonekeeper_core::config::{CleanupPolicy, PolicyConfig};
use zonekeeper_core::services::{
    plan_batches, AccountContext, CollectorService, ExportService, MutationService,
    RecordClassifier,
};
use zonekeeper_core::{DispositionCounts, Verdict};

// ===== Mock implementations =====

struct StaticDistributionSource {
    distributions: Vec<DistributionSummary>,
    fail: bool,
}

#[async_trait]
impl DistributionSource for StaticDistributionSource {
    async fn list_distributions(&self) -> zonekeeper_aws::Result<Vec<DistributionSummary>> {
        if self.fail {
            return Err(AwsError::InvalidCredentials {
                service: "sts".to_string(),
                raw_message: Some("assume role denied".to_string()),
            });
        }
        Ok(self.distributions.clone())
    }
}

#[derive(Default)]
struct RecordingZoneStore {
    records: Vec<ZoneRecord>,
    submissions: RwLock<Vec<ChangeBatch>>,
}

impl RecordingZoneStore {
    fn new(records: Vec<ZoneRecord>) -> Self {
        Self {
            records,
            submissions: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ZoneStore for RecordingZoneStore {
    async fn list_records(&self, _zone_id: &str) -> zonekeeper_aws::Result<Vec<ZoneRecord>> {
        Ok(self.records.clone())
    }

    async fn submit_deletions(
        &self,
        _zone_id: &str,
        batch: &ChangeBatch,
    ) -> zonekeeper_aws::Result<ChangeInfo> {
        let mut submissions = self.submissions.write().await;
        submissions.push(batch.clone());
        Ok(ChangeInfo {
            id: format!("C{:06}", submissions.len()),
            status: ChangeStatus::Pending,
        })
    }

    async fn wait_for_change(
        &self,
        change_id: &str,
        _timeout: Duration,
    ) -> zonekeeper_aws::Result<ChangeInfo> {
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status: ChangeStatus::InSync,
        })
    }
}

// ===== Fixtures =====

fn alias(name: &str, target: &str) -> ZoneRecord {
    ZoneRecord {
        name: name.to_string(),
        record_type: RecordType::A,
        ttl: None,
        alias_target: Some(AliasTarget {
            hosted_zone_id: "Z2FDTNDATAQYW2".to_string(),
            dns_name: target.to_string(),
            evaluate_target_health: false,
        }),
        values: vec![],
    }
}

fn txt(name: &str, value: &str) -> ZoneRecord {
    ZoneRecord {
        name: name.to_string(),
        record_type: RecordType::Txt,
        ttl: Some(300),
        alias_target: None,
        values: vec![value.to_string()],
    }
}

fn sample_zone() -> Vec<ZoneRecord> {
    vec![
        // Apex: protected by policy.
        alias("example.org.", "d000000abcdef8.cloudfront.net."),
        // Live distribution in the prod account.
        alias("www.example.org.", "d111111abcdef8.cloudfront.net."),
        // Dead: no account reports this domain.
        alias("old-service.example.org.", "d999999abcdef8.cloudfront.net."),
        // Ownership proof, never touched.
        txt("example.org.", "\"v=spf1 -all\""),
    ]
}

fn policy() -> CleanupPolicy {
    CleanupPolicy::compile(&PolicyConfig {
        protected: vec!["example.org.".to_string()],
        orphan_patterns: vec![],
    })
    .expect("policy compiles")
}

fn account(name: &str, distributions: Vec<DistributionSummary>, fail: bool) -> AccountContext {
    AccountContext {
        name: name.to_string(),
        source: Arc::new(StaticDistributionSource {
            distributions,
            fail,
        }),
    }
}

fn live_distribution(domain: &str, aliases: &[&str]) -> DistributionSummary {
    DistributionSummary {
        id: "E1".to_string(),
        domain_name: domain.to_string(),
        aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        enabled: true,
    }
}

// ===== Tests =====

#[tokio::test]
async fn full_flow_collect_classify_apply_export() {
    // One reachable account, one broken one.
    let collector = CollectorService::new(vec![
        account(
            "prod",
            vec![live_distribution(
                "d111111abcdef8.cloudfront.net",
                &["www.example.org"],
            )],
            false,
        ),
        account("legacy", vec![], true),
    ]);
    let report = collector.collect().await;
    assert_eq!(report.failed_accounts(), 1);

    let zone = sample_zone();
    let policy = policy();
    let classifier = RecordClassifier::new(&zone, &report.live, &policy);
    let dispositions = classifier.classify_all();

    let counts = DispositionCounts::tally(&dispositions);
    assert_eq!(counts.total(), 4);
    assert_eq!(counts.delete, 1);

    let deletes: Vec<_> = dispositions
        .iter()
        .filter(|d| d.verdict == Verdict::Delete)
        .collect();
    assert_eq!(deletes[0].record.name, "old-service.example.org.");
    assert!(deletes[0].reason.contains("dead CDN"));

    // Apply.
    let store = Arc::new(RecordingZoneStore::new(zone.clone()));
    let batches = plan_batches(&dispositions, "zonekeeper cleanup");
    assert_eq!(batches.len(), 1);

    let mutator = MutationService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
    let outcome = mutator
        .apply("Z123", &batches)
        .await
        .expect("mutation succeeds");
    assert_eq!(outcome.applied_batches, 1);
    assert_eq!(outcome.deleted_records, 1);
    assert_eq!(outcome.confirmed_batches, 1);

    let submissions = store.submissions.read().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].changes[0].name, "old-service.example.org.");

    // Export the (mock) post-mutation zone.
    drop(submissions);
    let tmp = tempfile::tempdir().expect("tempdir");
    let exporter = ExportService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
    let paths = exporter
        .export("Z123", "example.org", tmp.path())
        .await
        .expect("export succeeds");
    assert!(paths.snapshot.exists());
    assert!(paths.zone_file.exists());
    assert!(paths.manual_records.exists());
}

#[tokio::test]
async fn dry_run_performs_zero_mutating_calls() {
    let collector = CollectorService::new(vec![account("prod", vec![], false)]);
    let report = collector.collect().await;

    let zone = sample_zone();
    let policy = policy();
    let classifier = RecordClassifier::new(&zone, &report.live, &policy);
    let dispositions = classifier.classify_all();

    // With no live endpoints, both unprotected aliases become deletes.
    let counts = DispositionCounts::tally(&dispositions);
    assert_eq!(counts.delete, 2);

    // Dry run: plan, but never apply. The store must see no submissions.
    let store = Arc::new(RecordingZoneStore::new(zone));
    let batches = plan_batches(&dispositions, "zonekeeper cleanup");
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].changes.len(), 2);
    assert!(store.submissions.read().await.is_empty());
}

#[tokio::test]
async fn protected_record_survives_even_with_no_live_data() {
    let zone = sample_zone();
    let policy = policy();
    let live = zonekeeper_core::LiveEndpointSet::default();
    let classifier = RecordClassifier::new(&zone, &live, &policy);
    let dispositions = classifier.classify_all();

    let apex = dispositions
        .iter()
        .find(|d| d.record.name == "example.org." && d.record.record_type == RecordType::A)
        .expect("apex disposition present");
    assert_eq!(apex.verdict, Verdict::Keep);
    assert_eq!(apex.reason, "infrastructure");
}
