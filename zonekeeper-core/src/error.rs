//! Unified error type definition

use thiserror::Error;

// Re-export library error type
pub use zonekeeper_aws::AwsError;

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// The zone snapshot could not be read at all. Fatal: without a snapshot,
    /// classification is meaningless.
    #[error("Failed to read zone '{zone_id}': {source}")]
    ZoneReadFailed {
        zone_id: String,
        #[source]
        source: AwsError,
    },

    /// A change batch submission failed; remaining batches were not applied.
    #[error("Mutation aborted after {applied} of {total} batches: {source}")]
    MutationAborted {
        applied: usize,
        total: usize,
        #[source]
        source: AwsError,
    },

    /// Configuration file error
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Policy pattern could not be compiled
    #[error("Invalid policy pattern '{pattern}': {detail}")]
    InvalidPattern { pattern: String, detail: String },

    /// Export I/O error
    #[error("Export error: {0}")]
    ExportError(String),

    /// AWS layer error (converted from library)
    #[error("{0}")]
    Aws(#[from] AwsError),
}

impl CoreError {
    /// Whether the error reflects expected conditions (user input, missing
    /// resources) rather than a fault. `warn` level when `true`, `error`
    /// when `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ConfigError(_) | Self::InvalidPattern { .. } => true,
            Self::Aws(e) => e.is_expected(),
            Self::ZoneReadFailed { source, .. } | Self::MutationAborted { source, .. } => {
                source.is_expected()
            }
            Self::ExportError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
