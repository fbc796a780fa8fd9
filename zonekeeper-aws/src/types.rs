use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

// ============ Record Types ============

/// DNS record type as it appears in a hosted zone.
///
/// Serialized as the uppercase wire string (`"A"`, `"CNAME"`, ...). Types
/// outside the alias-zone vocabulary are preserved verbatim in
/// [`Other`](Self::Other) rather than rejected, so an unexpected record can
/// still be reported and classified instead of aborting a zone fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address (or alias) record.
    A,
    /// IPv6 address (or alias) record.
    Aaaa,
    /// Canonical name record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Start of authority record.
    Soa,
    /// Any other type, kept as its wire string.
    Other(String),
}

impl RecordType {
    /// Parse a wire type string. Never fails; unrecognized types become
    /// [`Other`](Self::Other).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SOA" => Self::Soa,
            other => Self::Other(other.to_string()),
        }
    }

    /// The uppercase wire string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Soa => "SOA",
            Self::Other(s) => s,
        }
    }

    /// Whether this type can carry a Route 53 alias target.
    #[must_use]
    pub fn is_alias_capable(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// ============ Zone Records ============

/// A Route 53 alias target: the record points at another named endpoint
/// instead of carrying literal rdata.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Hosted zone id of the target (CloudFront targets use a fixed id).
    pub hosted_zone_id: String,
    /// Target domain name.
    pub dns_name: String,
    /// Whether Route 53 evaluates the target's health.
    pub evaluate_target_health: bool,
}

/// One record set from the hosted zone.
///
/// Identity is `(name, record_type)`. Alias records carry an
/// [`AliasTarget`] and no values; conventional records carry one or more
/// values and usually a TTL.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    /// Fully-qualified record name (trailing dot as returned by the API).
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Time to live in seconds. Absent on alias records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Alias target, when this is an alias record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
    /// Rdata values, in zone order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl ZoneRecord {
    /// Whether this record is an alias (A/AAAA with an alias target).
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some() && self.record_type.is_alias_capable()
    }
}

// ============ Change Batches ============

/// Hard ceiling on the number of changes Route 53 accepts in one
/// `ChangeResourceRecordSets` call.
pub const MAX_CHANGE_BATCH_SIZE: usize = 500;

/// An ordered batch of record deletions, submitted atomically.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    /// Records to delete, in submission order.
    pub changes: Vec<ZoneRecord>,
    /// Operator-visible comment recorded in the change history.
    pub comment: String,
}

/// Propagation status of a submitted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    /// Submitted but not yet applied to all authoritative servers.
    Pending,
    /// Applied to all authoritative servers.
    InSync,
}

impl ChangeStatus {
    /// Parse the API status string. Anything other than `INSYNC` is treated
    /// as still pending.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("INSYNC") {
            Self::InSync
        } else {
            Self::Pending
        }
    }
}

/// Handle for a submitted change request.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Change id (without the `/change/` prefix).
    pub id: String,
    /// Last observed propagation status.
    pub status: ChangeStatus,
}

// ============ CDN Distributions ============

/// A CDN distribution as reported by one member account.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Distribution id.
    pub id: String,
    /// CDN-assigned canonical hostname (`dXXXXXXXXXXXXX.cloudfront.net`).
    pub domain_name: String,
    /// Custom hostnames the distribution answers for.
    pub aliases: Vec<String>,
    /// Whether the distribution is enabled.
    pub enabled: bool,
}
