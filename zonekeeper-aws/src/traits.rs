use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChangeBatch, ChangeInfo, DistributionSummary, ZoneRecord};

/// The authoritative DNS store for one or more hosted zones.
///
/// Implemented by [`Route53Client`](crate::Route53Client); the core crate's
/// services depend only on this trait so they can run against mocks.
#[async_trait]
pub trait ZoneStore: Send + Sync {
    /// Fetch the complete record set of a zone, following pagination, as one
    /// ordered sequence.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>>;

    /// Submit a batch of record deletions as a single atomic change request.
    async fn submit_deletions(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo>;

    /// Block until the given change reports fully propagated, up to
    /// `timeout`. Returns the last observed change info; a timeout is an
    /// error (callers decide whether it is fatal).
    async fn wait_for_change(&self, change_id: &str, timeout: Duration) -> Result<ChangeInfo>;
}

/// A per-account source of CDN distribution data.
///
/// Implemented by [`CloudFrontClient`](crate::CloudFrontClient); one instance
/// per member-account credential context.
#[async_trait]
pub trait DistributionSource: Send + Sync {
    /// List every distribution visible to this account's credentials.
    async fn list_distributions(&self) -> Result<Vec<DistributionSummary>>;
}
