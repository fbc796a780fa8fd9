//! Account data collection: the live-endpoint view across all member
//! accounts.

use std::sync::Arc;
use std::time::Duration;

use zonekeeper_aws::DistributionSource;

use crate::types::{AccountOutcome, CollectionReport, LiveEndpointSet};

/// Default per-account query timeout.
const DEFAULT_ACCOUNT_TIMEOUT: Duration = Duration::from_secs(30);

/// One member account's credential context.
pub struct AccountContext {
    /// Operator-facing account name.
    pub name: String,
    /// Distribution listing client for this account.
    pub source: Arc<dyn DistributionSource>,
}

impl std::fmt::Debug for AccountContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountContext")
            .field("name", &self.name)
            .field("source", &"<dyn DistributionSource>")
            .finish()
    }
}

/// Queries every account context and merges the results into the aggregate
/// live sets.
///
/// Accounts are queried concurrently; each gets its own timeout. A failing
/// or unreachable account is recorded in the report and excluded from the
/// live sets, but never aborts the run.
pub struct CollectorService {
    contexts: Vec<AccountContext>,
    account_timeout: Duration,
}

impl CollectorService {
    #[must_use]
    pub fn new(contexts: Vec<AccountContext>) -> Self {
        Self {
            contexts,
            account_timeout: DEFAULT_ACCOUNT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.account_timeout = timeout;
        self
    }

    /// Collect distributions from all accounts.
    pub async fn collect(&self) -> CollectionReport {
        let queries = self.contexts.iter().map(|ctx| {
            let source = Arc::clone(&ctx.source);
            let name = ctx.name.clone();
            let timeout = self.account_timeout;
            async move {
                match tokio::time::timeout(timeout, source.list_distributions()).await {
                    Ok(Ok(distributions)) => (name, Ok(distributions)),
                    Ok(Err(e)) => {
                        if e.is_expected() {
                            log::warn!("Account '{name}' unreachable: {e}");
                        } else {
                            log::error!("Account '{name}' query failed: {e}");
                        }
                        (name, Err(e.to_string()))
                    }
                    Err(_) => {
                        log::warn!(
                            "Account '{name}' timed out after {}s",
                            timeout.as_secs()
                        );
                        (name, Err(format!("timed out after {}s", timeout.as_secs())))
                    }
                }
            }
        });

        let results = futures::future::join_all(queries).await;

        let mut live = LiveEndpointSet::default();
        let mut outcomes = Vec::with_capacity(results.len());
        for (account, result) in results {
            match result {
                Ok(distributions) => {
                    for distribution in &distributions {
                        live.insert_distribution(distribution);
                    }
                    log::info!(
                        "Account '{account}': {} distributions",
                        distributions.len()
                    );
                    outcomes.push(AccountOutcome {
                        account,
                        result: Ok(distributions.len()),
                    });
                }
                Err(message) => outcomes.push(AccountOutcome {
                    account,
                    result: Err(message),
                }),
            }
        }

        if live.is_empty() && !outcomes.is_empty() {
            log::warn!("No live endpoints collected from any account");
        }

        CollectionReport { live, outcomes }
    }
}
