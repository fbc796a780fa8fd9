//! Test helpers: record factories and mock implementations of the AWS
//! trait seams.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use zonekeeper_aws::{
    AliasTarget, AwsError, ChangeBatch, ChangeInfo, ChangeStatus, DistributionSource,
    DistributionSummary, RecordType, ZoneRecord, ZoneStore,
};

// ===== Record factories =====

pub fn alias_record(name: &str, target: &str) -> ZoneRecord {
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

pub fn cname_record(name: &str, target: &str) -> ZoneRecord {
    ZoneRecord {
        name: name.to_string(),
        record_type: RecordType::Cname,
        ttl: Some(300),
        alias_target: None,
        values: vec![target.to_string()],
    }
}

pub fn value_record(name: &str, record_type: RecordType, values: &[&str]) -> ZoneRecord {
    ZoneRecord {
        name: name.to_string(),
        record_type,
        ttl: Some(300),
        alias_target: None,
        values: values.iter().map(|v| (*v).to_string()).collect(),
    }
}

pub fn distribution(domain: &str, aliases: &[&str]) -> DistributionSummary {
    DistributionSummary {
        id: format!("E{}", domain.len()),
        domain_name: domain.to_string(),
        aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        enabled: true,
    }
}

// ===== MockZoneStore =====

/// In-memory [`ZoneStore`] with failure injection.
pub struct MockZoneStore {
    records: RwLock<Vec<ZoneRecord>>,
    submitted: RwLock<Vec<ChangeBatch>>,
    /// If `Some(n)`, the n-th (0-based) submission fails.
    fail_submission_at: RwLock<Option<usize>>,
    /// If `true`, `wait_for_change` times out.
    fail_wait: RwLock<bool>,
    /// If `Some`, `list_records` fails with this message.
    list_error: RwLock<Option<String>>,
    wait_calls: RwLock<Vec<String>>,
}

impl MockZoneStore {
    pub fn new(records: Vec<ZoneRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            submitted: RwLock::new(Vec::new()),
            fail_submission_at: RwLock::new(None),
            fail_wait: RwLock::new(false),
            list_error: RwLock::new(None),
            wait_calls: RwLock::new(Vec::new()),
        }
    }

    pub async fn set_fail_submission_at(&self, index: usize) {
        *self.fail_submission_at.write().await = Some(index);
    }

    pub async fn set_fail_wait(&self, fail: bool) {
        *self.fail_wait.write().await = fail;
    }

    pub async fn set_list_error(&self, message: &str) {
        *self.list_error.write().await = Some(message.to_string());
    }

    pub async fn submitted_batches(&self) -> Vec<ChangeBatch> {
        self.submitted.read().await.clone()
    }

    pub async fn wait_calls(&self) -> Vec<String> {
        self.wait_calls.read().await.clone()
    }
}

#[async_trait]
impl ZoneStore for MockZoneStore {
    async fn list_records(&self, zone_id: &str) -> zonekeeper_aws::Result<Vec<ZoneRecord>> {
        if let Some(message) = self.list_error.read().await.clone() {
            return Err(AwsError::ZoneNotFound {
                service: "route53".to_string(),
                zone_id: zone_id.to_string(),
                raw_message: Some(message),
            });
        }
        Ok(self.records.read().await.clone())
    }

    async fn submit_deletions(
        &self,
        _zone_id: &str,
        batch: &ChangeBatch,
    ) -> zonekeeper_aws::Result<ChangeInfo> {
        let mut submitted = self.submitted.write().await;
        if *self.fail_submission_at.read().await == Some(submitted.len()) {
            return Err(AwsError::ChangeBatchRejected {
                service: "route53".to_string(),
                detail: "injected failure".to_string(),
            });
        }
        submitted.push(batch.clone());
        Ok(ChangeInfo {
            id: format!("C{:06}", submitted.len()),
            status: ChangeStatus::Pending,
        })
    }

    async fn wait_for_change(
        &self,
        change_id: &str,
        timeout: Duration,
    ) -> zonekeeper_aws::Result<ChangeInfo> {
        self.wait_calls.write().await.push(change_id.to_string());
        if *self.fail_wait.read().await {
            return Err(AwsError::Timeout {
                service: "route53".to_string(),
                detail: format!("change {change_id} not INSYNC after {}s", timeout.as_secs()),
            });
        }
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status: ChangeStatus::InSync,
        })
    }
}

// ===== MockDistributionSource =====

/// Configurable [`DistributionSource`]: fixed distributions, an injected
/// failure, or an artificial delay (for timeout tests).
pub struct MockDistributionSource {
    distributions: Vec<DistributionSummary>,
    fail_with: Option<AwsError>,
    delay: Option<Duration>,
}

impl MockDistributionSource {
    pub fn new(distributions: Vec<DistributionSummary>) -> Self {
        Self {
            distributions,
            fail_with: None,
            delay: None,
        }
    }

    pub fn failing(error: AwsError) -> Self {
        Self {
            distributions: Vec::new(),
            fail_with: Some(error),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl DistributionSource for MockDistributionSource {
    async fn list_distributions(&self) -> zonekeeper_aws::Result<Vec<DistributionSummary>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(self.distributions.clone())
    }
}
