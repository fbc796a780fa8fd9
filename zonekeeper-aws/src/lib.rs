//! # zonekeeper-aws
//!
//! Typed, hand-signed clients for the AWS APIs zonekeeper consumes.
//!
//! | Service | Operations | Wire format |
//! |---------|-----------|-------------|
//! | Route 53 | `ListResourceRecordSets`, `ChangeResourceRecordSets` (DELETE), `GetChange` | REST + XML |
//! | CloudFront | `ListDistributions` | REST + XML |
//! | STS | `AssumeRole` | Query + XML |
//!
//! All requests are signed with AWS Signature Version 4 ([`sign`]); transient
//! failures (network, timeout, throttling) are retried with exponential
//! backoff by [`http_client::HttpUtils`].
//!
//! The [`ZoneStore`] and [`DistributionSource`] traits are the seams the core
//! crate's services consume, so reconciliation logic is testable without
//! touching the network.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonekeeper_aws::{AwsCredentials, Route53Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = AwsCredentials::from_env()?;
//!     let route53 = Route53Client::new(credentials);
//!     let records = route53.list_all_records("Z0123456789ABCDEFGHIJ").await?;
//!     for record in &records {
//!         println!("{} {}", record.name, record.record_type);
//!     }
//!     Ok(())
//! }
//! ```

mod clients;
mod credentials;
mod error;
mod factory;
pub mod http_client;
mod sign;
mod traits;
mod types;

pub use clients::common::{decode_record_name, normalize_domain_name};
pub use clients::{CloudFrontClient, Route53Client, StsClient};
pub use credentials::AwsCredentials;
pub use factory::AssumedRoleSource;
pub use error::{AwsError, Result};
pub use sign::{RequestSigner, SignedHeaders};
pub use traits::{DistributionSource, ZoneStore};
pub use types::{
    AliasTarget, ChangeBatch, ChangeInfo, ChangeStatus, DistributionSummary, RecordType,
    ZoneRecord, MAX_CHANGE_BATCH_SIZE,
};
