//! AWS service client implementations.

/// Shared utilities used by the service clients.
pub mod common;

mod cloudfront;
mod route53;
mod sts;

pub use cloudfront::CloudFrontClient;
pub use route53::Route53Client;
pub use sts::StsClient;
