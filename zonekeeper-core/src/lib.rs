//! Zonekeeper Core Library
//!
//! The reconciliation engine for a DNS zone shared across an organization's
//! member accounts:
//! - Account data collection (CDN distributions per account)
//! - Record classification (KEEP / DELETE / SKIP with reasons)
//! - Batched, resumable mutation with propagation waits
//! - Zone export for audit and diffing
//!
//! The engine is platform-independent: it consumes the `ZoneStore` and
//! `DistributionSource` traits from `zonekeeper-aws`, so every service runs
//! against mocks in tests.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{CleanupPolicy, Config};
pub use error::{CoreError, CoreResult};
pub use types::{
    AccountOutcome, CollectionReport, Disposition, DispositionCounts, LiveEndpointSet, Verdict,
};
