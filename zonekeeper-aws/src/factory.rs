//! Distribution-source factory for member-account credential contexts.

use async_trait::async_trait;

use crate::clients::{CloudFrontClient, StsClient};
use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::traits::DistributionSource;
use crate::types::DistributionSummary;

/// A [`DistributionSource`] that assumes a role in the member account on
/// every listing.
///
/// Assuming lazily (instead of at construction) keeps a broken role from
/// failing anything but its own account's collection, and temporary
/// credentials are never held longer than one query.
pub struct AssumedRoleSource {
    sts: StsClient,
    role_arn: String,
    session_name: String,
}

impl AssumedRoleSource {
    #[must_use]
    pub fn new(base_credentials: AwsCredentials, role_arn: String, session_name: String) -> Self {
        Self {
            sts: StsClient::new(base_credentials),
            role_arn,
            session_name,
        }
    }
}

#[async_trait]
impl DistributionSource for AssumedRoleSource {
    async fn list_distributions(&self) -> Result<Vec<DistributionSummary>> {
        let credentials = self
            .sts
            .assume_role(&self.role_arn, &self.session_name)
            .await?;
        CloudFrontClient::new(credentials)
            .list_all_distributions()
            .await
    }
}
