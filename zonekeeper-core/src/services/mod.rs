//! Reconciliation services.

mod classifier;
mod collector;
mod exporter;
mod mutator;

pub use classifier::{RecordClassifier, MAX_ALIAS_HOPS};
pub use collector::{AccountContext, CollectorService};
pub use exporter::{render_manual_records, render_zone_file, ExportPaths, ExportService};
pub use mutator::{
    plan_batches, MutationOutcome, MutationService, DEFAULT_PROPAGATION_TIMEOUT,
};

use std::sync::Arc;

use zonekeeper_aws::{
    AssumedRoleSource, AwsCredentials, CloudFrontClient, DistributionSource,
};

use crate::config::AccountConfig;
use crate::error::{CoreError, CoreResult};

/// Build one collector context per configured account.
///
/// Accounts with a `role_arn` are reached by assuming that role from the
/// management-account credentials; accounts with static keys use them
/// directly.
pub fn account_contexts(
    accounts: &[AccountConfig],
    base_credentials: &AwsCredentials,
) -> CoreResult<Vec<AccountContext>> {
    accounts
        .iter()
        .map(|account| {
            let source: Arc<dyn DistributionSource> = if let Some(role_arn) = &account.role_arn {
                Arc::new(AssumedRoleSource::new(
                    base_credentials.clone(),
                    role_arn.clone(),
                    format!("zonekeeper-{}", account.name),
                ))
            } else if let (Some(key_id), Some(secret)) =
                (&account.access_key_id, &account.secret_access_key)
            {
                Arc::new(CloudFrontClient::new(AwsCredentials::new(
                    key_id.clone(),
                    secret.clone(),
                )))
            } else {
                return Err(CoreError::ConfigError(format!(
                    "account '{}' needs either role_arn or access keys",
                    account.name
                )));
            };
            Ok(AccountContext {
                name: account.name.clone(),
                source,
            })
        })
        .collect()
}
