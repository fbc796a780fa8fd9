//! Run configuration and the compiled cleanup policy.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use zonekeeper_aws::normalize_domain_name;

use crate::error::{CoreError, CoreResult};

/// Pattern a CDN-assigned canonical hostname must match.
const CDN_DOMAIN_PATTERN: &str = r"^[a-z0-9]+\.cloudfront\.net$";

/// Top-level run configuration, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The authoritative zone under management.
    pub zone: ZoneConfig,
    /// Member account contexts to collect CDN data from.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Cleanup policy knobs.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Export output settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// The zone section.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    /// Hosted zone id (`Z...`).
    pub id: String,
    /// Zone apex name (`example.org`).
    pub name: String,
}

/// One member-account credential context.
///
/// Either a role to assume from the management-account credentials, or
/// static keys. Role ARN wins when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Operator-facing account name.
    pub name: String,
    /// Role to assume in the member account.
    #[serde(default)]
    pub role_arn: Option<String>,
    /// Static access key id (alternative to `role_arn`).
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Static secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

/// Raw cleanup policy as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Protected infrastructure names, never deleted.
    #[serde(default)]
    pub protected: Vec<String>,
    /// Glob patterns for hostnames whose validation records are known
    /// orphans (stale environments, deprecated subdomains).
    #[serde(default)]
    pub orphan_patterns: Vec<String>,
}

/// Export output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory the exporter writes into.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("zone-export")
}

impl Config {
    /// Load and parse a TOML config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&text)
            .map_err(|e| CoreError::ConfigError(format!("{}: {e}", path.display())))
    }
}

// ============ Compiled policy ============

/// The cleanup policy with patterns compiled, ready for the classifier.
#[derive(Debug)]
pub struct CleanupPolicy {
    protected: HashSet<String>,
    orphan_patterns: Vec<Regex>,
    cdn_pattern: Regex,
}

impl CleanupPolicy {
    /// Compile a raw policy. Protected names are normalized; orphan globs
    /// are translated to anchored regexes.
    pub fn compile(config: &PolicyConfig) -> CoreResult<Self> {
        let protected = config
            .protected
            .iter()
            .map(|n| normalize_domain_name(n))
            .collect();

        let mut orphan_patterns = Vec::with_capacity(config.orphan_patterns.len());
        for pattern in &config.orphan_patterns {
            let regex = Regex::new(&glob_to_regex(&pattern.to_ascii_lowercase())).map_err(
                |e| CoreError::InvalidPattern {
                    pattern: pattern.clone(),
                    detail: e.to_string(),
                },
            )?;
            orphan_patterns.push(regex);
        }

        let cdn_pattern = Regex::new(CDN_DOMAIN_PATTERN).map_err(|e| {
            CoreError::InvalidPattern {
                pattern: CDN_DOMAIN_PATTERN.to_string(),
                detail: e.to_string(),
            }
        })?;

        Ok(Self {
            protected,
            orphan_patterns,
            cdn_pattern,
        })
    }

    /// Whether `name` (normalized) is in the protected allow-list.
    #[must_use]
    pub fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(&normalize_domain_name(name))
    }

    /// Whether `domain` matches a known-orphaned hostname pattern.
    #[must_use]
    pub fn is_orphan_domain(&self, domain: &str) -> bool {
        let domain = normalize_domain_name(domain);
        self.orphan_patterns.iter().any(|p| p.is_match(&domain))
    }

    /// Whether `domain` looks like a CDN-assigned canonical hostname.
    #[must_use]
    pub fn is_cdn_domain(&self, domain: &str) -> bool {
        self.cdn_pattern.is_match(&normalize_domain_name(domain))
    }
}

/// Translate a `*`-glob into an anchored regex.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for (i, part) in glob.split('*').enumerate() {
        if i > 0 {
            out.push_str(".*");
        }
        out.push_str(&regex::escape(part));
    }
    out.push('$');
    out
}
