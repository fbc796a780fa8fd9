//! The reconciliation rule engine.
//!
//! Pure function of (zone snapshot, live endpoint sets, cleanup policy):
//! every record gets exactly one [`Disposition`]. The engine is biased
//! fail-safe throughout: anything ambiguous, unresolvable or malformed is
//! kept, never deleted.

use std::collections::HashMap;

use zonekeeper_aws::{normalize_domain_name, RecordType, ZoneRecord};

use crate::config::CleanupPolicy;
use crate::types::{Disposition, LiveEndpointSet, Verdict};

/// Hop cap for same-zone alias chain resolution. Protects against cyclic
/// zones; on cap the last-seen target is returned unresolved.
pub const MAX_ALIAS_HOPS: usize = 6;

/// Classifies every record of one zone snapshot.
pub struct RecordClassifier<'a> {
    zone: &'a [ZoneRecord],
    live: &'a LiveEndpointSet,
    policy: &'a CleanupPolicy,
    /// Normalized name -> alias record, for chain resolution.
    alias_index: HashMap<String, &'a ZoneRecord>,
}

impl<'a> RecordClassifier<'a> {
    #[must_use]
    pub fn new(
        zone: &'a [ZoneRecord],
        live: &'a LiveEndpointSet,
        policy: &'a CleanupPolicy,
    ) -> Self {
        let alias_index = zone
            .iter()
            .filter(|r| r.is_alias())
            .map(|r| (normalize_domain_name(&r.name), r))
            .collect();
        Self {
            zone,
            live,
            policy,
            alias_index,
        }
    }

    /// Classify the whole snapshot, one disposition per record, in zone
    /// order.
    #[must_use]
    pub fn classify_all(&self) -> Vec<Disposition> {
        self.zone
            .iter()
            .map(|record| {
                let (verdict, reason) = self.classify(record);
                log::debug!("{} {} -> {verdict} ({reason})", record.name, record.record_type);
                Disposition {
                    record: record.clone(),
                    verdict,
                    reason,
                }
            })
            .collect()
    }

    /// Resolve same-zone alias indirection to the ultimate target.
    ///
    /// Follows alias records whose name matches the current target until the
    /// target leaves the zone (no alias record carries its name) or the hop
    /// cap is reached. Resolving an already-external name returns it
    /// unchanged.
    #[must_use]
    pub fn resolve_chain(&self, name: &str) -> String {
        let mut current = normalize_domain_name(name);
        for _ in 0..MAX_ALIAS_HOPS {
            let Some(record) = self.alias_index.get(&current) else {
                break;
            };
            let Some(alias) = &record.alias_target else {
                break;
            };
            current = normalize_domain_name(&alias.dns_name);
        }
        current
    }

    /// Apply the rule chain to one record; first match wins.
    fn classify(&self, record: &ZoneRecord) -> (Verdict, String) {
        if record.name.trim().is_empty() {
            return (Verdict::Keep, "unparseable".to_string());
        }

        match &record.record_type {
            // Zone plumbing is never touched.
            RecordType::Ns | RecordType::Soa => (Verdict::Skip, "essential".to_string()),

            // May carry manually-managed domain ownership proofs.
            RecordType::Mx | RecordType::Txt => {
                (Verdict::Skip, "email/verification".to_string())
            }

            RecordType::Cname => self.classify_cname(record),

            RecordType::A | RecordType::Aaaa => self.classify_address(record),

            // A type this zone's design does not use; keep it visible and
            // untouched rather than guessing.
            RecordType::Other(_) => (Verdict::Keep, "unparseable".to_string()),
        }
    }

    /// Rule 3/4: validation-record CNAMEs with a known-orphaned parent
    /// domain are deleted; every other CNAME needs manual review.
    fn classify_cname(&self, record: &ZoneRecord) -> (Verdict, String) {
        let name = normalize_domain_name(&record.name);
        if let Some(domain) = validation_record_domain(&name) {
            if self.policy.is_orphan_domain(domain) {
                return (
                    Verdict::Delete,
                    format!("orphaned validation record for {domain}"),
                );
            }
        }
        (Verdict::Skip, "CNAME (kept)".to_string())
    }

    /// Rule 5/6: A/AAAA records. Alias records are judged against the live
    /// sets; non-alias address records are out of scope.
    fn classify_address(&self, record: &ZoneRecord) -> (Verdict, String) {
        let Some(alias) = &record.alias_target else {
            return (Verdict::Skip, "non-alias".to_string());
        };
        if alias.dns_name.trim().is_empty() {
            return (Verdict::Keep, "unparseable".to_string());
        }

        let name = normalize_domain_name(&record.name);
        if self.policy.is_protected(&name) {
            return (Verdict::Keep, "infrastructure".to_string());
        }
        if self.live.configured_aliases.contains(&name) {
            return (Verdict::Keep, "live CDN alias".to_string());
        }

        let target = normalize_domain_name(&alias.dns_name);
        if self.policy.is_cdn_domain(&target) {
            return if self.live.cdn_domains.contains(&target) {
                (Verdict::Keep, "live CDN".to_string())
            } else {
                (Verdict::Delete, format!("dead CDN: {target}"))
            };
        }

        // Target is another in-zone record: follow the chain.
        let resolved = self.resolve_chain(&target);
        if self.policy.is_cdn_domain(&resolved) {
            if self.live.cdn_domains.contains(&resolved) {
                (Verdict::Keep, format!("chain to live CDN: {resolved}"))
            } else {
                (Verdict::Delete, format!("chain to dead CDN: {resolved}"))
            }
        } else {
            (Verdict::Keep, format!("unknown target: {target}"))
        }
    }
}

/// For a validation record (`_<token>.<domain>`), the domain the validation
/// belongs to. `None` when the name does not start with the `_` sentinel.
fn validation_record_domain(name: &str) -> Option<&str> {
    if !name.starts_with('_') {
        return None;
    }
    name.split_once('.').map(|(_, rest)| rest)
}
