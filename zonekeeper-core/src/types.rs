//! Reconciliation value types.

use std::collections::HashSet;

use serde::Serialize;

use zonekeeper_aws::{normalize_domain_name, DistributionSummary, ZoneRecord};

// ============ Dispositions ============

/// Classifier verdict for one zone record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The record stays; it is (or may be) serving live traffic.
    Keep,
    /// The record is a confirmed orphan and will be deleted.
    Delete,
    /// The record is out of cleanup scope and is never touched.
    Skip,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "KEEP"),
            Self::Delete => write!(f, "DELETE"),
            Self::Skip => write!(f, "SKIP"),
        }
    }
}

/// One record's verdict plus its human-readable justification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disposition {
    /// The zone record being judged.
    pub record: ZoneRecord,
    /// The verdict.
    pub verdict: Verdict,
    /// Why the verdict was reached.
    pub reason: String,
}

/// Per-verdict totals over a full classification pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionCounts {
    pub keep: usize,
    pub delete: usize,
    pub skip: usize,
}

impl DispositionCounts {
    /// Tally verdicts over a set of dispositions.
    #[must_use]
    pub fn tally(dispositions: &[Disposition]) -> Self {
        let mut counts = Self::default();
        for d in dispositions {
            match d.verdict {
                Verdict::Keep => counts.keep += 1,
                Verdict::Delete => counts.delete += 1,
                Verdict::Skip => counts.skip += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.keep + self.delete + self.skip
    }
}

// ============ Live endpoints ============

/// The aggregate view of live CDN endpoints across all reachable accounts.
///
/// Rebuilt from live API calls every run, never persisted. All names are
/// normalized (lowercased, trailing dot stripped) so membership checks are
/// exact string lookups.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEndpointSet {
    /// CDN-assigned canonical hostnames (`dXXXX.cloudfront.net`).
    pub cdn_domains: HashSet<String>,
    /// Custom hostnames configured on any live distribution.
    pub configured_aliases: HashSet<String>,
}

impl LiveEndpointSet {
    /// Merge one distribution into the live sets.
    ///
    /// Disabled distributions are included too: they still own their domain
    /// name, and deleting records that point at them would be a false
    /// positive the moment the distribution is re-enabled.
    pub fn insert_distribution(&mut self, distribution: &DistributionSummary) {
        self.cdn_domains
            .insert(normalize_domain_name(&distribution.domain_name));
        for alias in &distribution.aliases {
            self.configured_aliases.insert(normalize_domain_name(alias));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cdn_domains.is_empty() && self.configured_aliases.is_empty()
    }
}

// ============ Collection reports ============

/// Result of querying one account context.
#[derive(Debug, Clone)]
pub struct AccountOutcome {
    /// Account context name.
    pub account: String,
    /// Distribution count on success, failure message otherwise.
    pub result: Result<usize, String>,
}

/// The collector's full output: merged live sets plus per-account outcomes
/// for operator visibility.
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    /// Aggregate live sets over all reachable accounts.
    pub live: LiveEndpointSet,
    /// One outcome per configured account, in configuration order.
    pub outcomes: Vec<AccountOutcome>,
}

impl CollectionReport {
    /// Number of accounts that could not be queried.
    #[must_use]
    pub fn failed_accounts(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}
