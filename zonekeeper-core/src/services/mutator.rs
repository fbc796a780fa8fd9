//! Batched application of delete dispositions against the live zone.

use std::sync::Arc;
use std::time::Duration;

use zonekeeper_aws::{ChangeBatch, ZoneStore, MAX_CHANGE_BATCH_SIZE};

use crate::error::{CoreError, CoreResult};
use crate::types::{Disposition, Verdict};

/// Upper bound on one propagation wait. INSYNC confirmation is advisory;
/// exceeding this is logged and the run continues.
pub const DEFAULT_PROPAGATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Partition the DELETE-verdict subset into ordered change batches of at
/// most [`MAX_CHANGE_BATCH_SIZE`] deletions, preserving classifier order.
#[must_use]
pub fn plan_batches(dispositions: &[Disposition], comment: &str) -> Vec<ChangeBatch> {
    let deletions: Vec<_> = dispositions
        .iter()
        .filter(|d| d.verdict == Verdict::Delete)
        .map(|d| d.record.clone())
        .collect();

    deletions
        .chunks(MAX_CHANGE_BATCH_SIZE)
        .map(|chunk| ChangeBatch {
            changes: chunk.to_vec(),
            comment: comment.to_string(),
        })
        .collect()
}

/// Outcome of a completed mutation run.
#[derive(Debug, Clone, Copy)]
pub struct MutationOutcome {
    /// Batches successfully submitted.
    pub applied_batches: usize,
    /// Total record deletions across applied batches.
    pub deleted_records: usize,
    /// Batches whose propagation was confirmed INSYNC within the wait cap.
    pub confirmed_batches: usize,
}

/// Applies planned batches against the zone store, strictly in order.
pub struct MutationService {
    store: Arc<dyn ZoneStore>,
    propagation_timeout: Duration,
}

impl MutationService {
    #[must_use]
    pub fn new(store: Arc<dyn ZoneStore>) -> Self {
        Self {
            store,
            propagation_timeout: DEFAULT_PROPAGATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_propagation_timeout(mut self, timeout: Duration) -> Self {
        self.propagation_timeout = timeout;
        self
    }

    /// Submit every batch sequentially.
    ///
    /// Batch N+1 is not submitted until batch N's submission completed. A
    /// submission failure aborts the remaining batches
    /// ([`CoreError::MutationAborted`]); already-applied batches stay
    /// applied. A propagation-wait failure is logged and the run proceeds.
    pub async fn apply(&self, zone_id: &str, batches: &[ChangeBatch]) -> CoreResult<MutationOutcome> {
        let total = batches.len();
        let mut outcome = MutationOutcome {
            applied_batches: 0,
            deleted_records: 0,
            confirmed_batches: 0,
        };

        for (index, batch) in batches.iter().enumerate() {
            let info = match self.store.submit_deletions(zone_id, batch).await {
                Ok(info) => info,
                Err(e) => {
                    log::error!(
                        "Batch {}/{total} submission failed, aborting remaining batches: {e}",
                        index + 1
                    );
                    return Err(CoreError::MutationAborted {
                        applied: outcome.applied_batches,
                        total,
                        source: e,
                    });
                }
            };

            outcome.applied_batches += 1;
            outcome.deleted_records += batch.changes.len();
            log::info!(
                "Batch {}/{total} submitted ({} deletions, change {})",
                index + 1,
                batch.changes.len(),
                info.id
            );

            match self
                .store
                .wait_for_change(&info.id, self.propagation_timeout)
                .await
            {
                Ok(_) => {
                    outcome.confirmed_batches += 1;
                    log::info!("Change {} is INSYNC", info.id);
                }
                Err(e) => {
                    // Advisory only; the next batch does not depend on it.
                    log::warn!("Propagation not confirmed for change {}: {e}", info.id);
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{alias_record, MockZoneStore};

    fn delete_dispositions(n: usize) -> Vec<Disposition> {
        (0..n)
            .map(|i| Disposition {
                record: alias_record(
                    &format!("r{i}.example.org."),
                    "d111111abcdef8.cloudfront.net.",
                ),
                verdict: Verdict::Delete,
                reason: "dead CDN: d111111abcdef8.cloudfront.net".to_string(),
            })
            .collect()
    }

    // ============ plan_batches ============

    #[test]
    fn plan_skips_keep_and_skip_verdicts() {
        let mut dispositions = delete_dispositions(2);
        dispositions.push(Disposition {
            record: alias_record("keep.example.org.", "d222222abcdef8.cloudfront.net."),
            verdict: Verdict::Keep,
            reason: "live CDN".to_string(),
        });
        dispositions.push(Disposition {
            record: alias_record("skip.example.org.", "x."),
            verdict: Verdict::Skip,
            reason: "non-alias".to_string(),
        });

        let batches = plan_batches(&dispositions, "cleanup");
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].changes.len(), 2);
    }

    #[test]
    fn plan_empty_when_no_deletes() {
        let batches = plan_batches(&[], "cleanup");
        assert!(batches.is_empty());
    }

    #[test]
    fn plan_partitions_at_batch_ceiling() {
        // 1001 deletions -> ceil(1001/500) = 3 batches of 500/500/1.
        let dispositions = delete_dispositions(1001);
        let batches = plan_batches(&dispositions, "cleanup");
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].changes.len(), MAX_CHANGE_BATCH_SIZE);
        assert_eq!(batches[1].changes.len(), MAX_CHANGE_BATCH_SIZE);
        assert_eq!(batches[2].changes.len(), 1);
    }

    #[test]
    fn plan_preserves_input_order() {
        let dispositions = delete_dispositions(750);
        let batches = plan_batches(&dispositions, "cleanup");
        assert_eq!(batches[0].changes[0].name, "r0.example.org.");
        assert_eq!(batches[0].changes[499].name, "r499.example.org.");
        assert_eq!(batches[1].changes[0].name, "r500.example.org.");
        assert_eq!(batches[1].changes[249].name, "r749.example.org.");
    }

    #[test]
    fn plan_exact_multiple_of_ceiling() {
        let dispositions = delete_dispositions(1000);
        let batches = plan_batches(&dispositions, "cleanup");
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].changes.len(), MAX_CHANGE_BATCH_SIZE);
    }

    // ============ apply ============

    #[tokio::test]
    async fn apply_submits_batches_in_order() {
        let store = Arc::new(MockZoneStore::new(vec![]));
        let service = MutationService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
        let batches = plan_batches(&delete_dispositions(3), "cleanup");

        let outcome = service.apply("Z123", &batches).await;
        assert!(outcome.is_ok(), "apply failed: {outcome:?}");
        let Ok(outcome) = outcome else {
            return;
        };
        assert_eq!(outcome.applied_batches, 1);
        assert_eq!(outcome.deleted_records, 3);
        assert_eq!(outcome.confirmed_batches, 1);

        let submitted = store.submitted_batches().await;
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].changes[0].name, "r0.example.org.");
    }

    #[tokio::test]
    async fn apply_aborts_remaining_batches_on_submission_failure() {
        let store = Arc::new(MockZoneStore::new(vec![]));
        store.set_fail_submission_at(1).await;
        let service = MutationService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
        let batches = plan_batches(&delete_dispositions(1200), "cleanup");
        assert_eq!(batches.len(), 3);

        let result = service.apply("Z123", &batches).await;
        assert!(
            matches!(
                &result,
                Err(CoreError::MutationAborted {
                    applied: 1,
                    total: 3,
                    ..
                })
            ),
            "unexpected result: {result:?}"
        );
        // Only the first batch landed; the third was never submitted.
        assert_eq!(store.submitted_batches().await.len(), 1);
    }

    #[tokio::test]
    async fn apply_continues_after_wait_failure() {
        let store = Arc::new(MockZoneStore::new(vec![]));
        store.set_fail_wait(true).await;
        let service = MutationService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
        let batches = plan_batches(&delete_dispositions(1200), "cleanup");

        let outcome = service.apply("Z123", &batches).await;
        assert!(outcome.is_ok(), "wait failure must be non-fatal: {outcome:?}");
        let Ok(outcome) = outcome else {
            return;
        };
        assert_eq!(outcome.applied_batches, 3);
        assert_eq!(outcome.deleted_records, 1200);
        assert_eq!(outcome.confirmed_batches, 0);
        assert_eq!(store.submitted_batches().await.len(), 3);
        assert_eq!(store.wait_calls().await.len(), 3);
    }

    #[tokio::test]
    async fn apply_no_batches_is_a_noop() {
        let store = Arc::new(MockZoneStore::new(vec![]));
        let service = MutationService::new(Arc::clone(&store) as Arc<dyn ZoneStore>);
        let outcome = service.apply("Z123", &[]).await;
        assert!(outcome.is_ok());
        let Ok(outcome) = outcome else {
            return;
        };
        assert_eq!(outcome.applied_batches, 0);
        assert!(store.submitted_batches().await.is_empty());
    }
}
