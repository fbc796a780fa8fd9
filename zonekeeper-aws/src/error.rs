use serde::Serialize;

/// Unified error type for all AWS API operations.
///
/// Each variant carries a `service` field identifying which API produced the
/// error (`"route53"`, `"cloudfront"`, `"sts"`), plus variant-specific
/// context.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on
/// retry:
/// - [`NetworkError`](Self::NetworkError) — connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`Throttling`](Self::Throttling) — API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential
/// backoff.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code")]
pub enum AwsError {
    /// A network-level error occurred (DNS failure, connection refused, 5xx).
    NetworkError {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The API rejected the request rate (HTTP 429, `Throttling`,
    /// `PriorRequestNotComplete`).
    Throttling {
        /// Service that produced the error.
        service: String,
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The signature or security token was rejected.
    InvalidCredentials {
        /// Service that produced the error.
        service: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The caller is authenticated but not authorized for the operation.
    AccessDenied {
        /// Service that produced the error.
        service: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The hosted zone does not exist or is not visible to the caller.
    ZoneNotFound {
        /// Service that produced the error.
        service: String,
        /// Zone id that was not found.
        zone_id: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// Route 53 rejected a change batch (`InvalidChangeBatch`).
    ChangeBatchRejected {
        /// Service that produced the error.
        service: String,
        /// Rejection details from the API.
        detail: String,
    },

    /// A request parameter is invalid.
    InvalidInput {
        /// Service that produced the error.
        service: String,
        /// Details about the invalid input.
        detail: String,
    },

    /// Failed to parse the API's XML response.
    ParseError {
        /// Service that produced the error.
        service: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the API.
    Unknown {
        /// Service that produced the error.
        service: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl AwsError {
    /// Whether the error reflects expected conditions (caller input, missing
    /// resources, permissions) rather than a fault. Used for log-level
    /// selection: `warn` when `true`, `error` when `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::AccessDenied { .. }
                | Self::ZoneNotFound { .. }
                | Self::ChangeBatchRejected { .. }
                | Self::InvalidInput { .. }
        )
    }

    /// Whether the error is transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::Throttling { .. }
        )
    }
}

impl std::fmt::Display for AwsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { service, detail } => {
                write!(f, "[{service}] Network error: {detail}")
            }
            Self::Timeout { service, detail } => {
                write!(f, "[{service}] Request timeout: {detail}")
            }
            Self::Throttling {
                service,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{service}] Throttled (retry after {secs}s)")
                } else {
                    write!(f, "[{service}] Throttled")
                }
            }
            Self::InvalidCredentials {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{service}] Invalid credentials")
                }
            }
            Self::AccessDenied {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Access denied: {msg}")
                } else {
                    write!(f, "[{service}] Access denied")
                }
            }
            Self::ZoneNotFound {
                service,
                zone_id,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Hosted zone '{zone_id}' not found: {msg}")
                } else {
                    write!(f, "[{service}] Hosted zone '{zone_id}' not found")
                }
            }
            Self::ChangeBatchRejected { service, detail } => {
                write!(f, "[{service}] Change batch rejected: {detail}")
            }
            Self::InvalidInput { service, detail } => {
                write!(f, "[{service}] Invalid input: {detail}")
            }
            Self::ParseError { service, detail } => {
                write!(f, "[{service}] Parse error: {detail}")
            }
            Self::Unknown {
                service,
                raw_message,
                ..
            } => {
                write!(f, "[{service}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for AwsError {}

/// Convenience type alias for `Result<T, AwsError>`.
pub type Result<T> = std::result::Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = AwsError::NetworkError {
            service: "route53".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[route53] Network error: connection refused");
    }

    #[test]
    fn display_throttling_with_retry() {
        let e = AwsError::Throttling {
            service: "cloudfront".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[cloudfront] Throttled (retry after 30s)");
    }

    #[test]
    fn display_zone_not_found() {
        let e = AwsError::ZoneNotFound {
            service: "route53".to_string(),
            zone_id: "Z123".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[route53] Hosted zone 'Z123' not found");
    }

    #[test]
    fn display_change_batch_rejected() {
        let e = AwsError::ChangeBatchRejected {
            service: "route53".to_string(),
            detail: "record does not match".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[route53] Change batch rejected: record does not match"
        );
    }

    #[test]
    fn retryable_variants() {
        assert!(AwsError::NetworkError {
            service: "sts".into(),
            detail: "x".into(),
        }
        .is_retryable());
        assert!(AwsError::Timeout {
            service: "sts".into(),
            detail: "x".into(),
        }
        .is_retryable());
        assert!(AwsError::Throttling {
            service: "sts".into(),
            retry_after: None,
            raw_message: None,
        }
        .is_retryable());
        assert!(!AwsError::AccessDenied {
            service: "sts".into(),
            raw_message: None,
        }
        .is_retryable());
        assert!(!AwsError::ParseError {
            service: "sts".into(),
            detail: "x".into(),
        }
        .is_retryable());
    }

    #[test]
    fn expected_variants() {
        assert!(AwsError::AccessDenied {
            service: "route53".into(),
            raw_message: None,
        }
        .is_expected());
        assert!(AwsError::ZoneNotFound {
            service: "route53".into(),
            zone_id: "Z1".into(),
            raw_message: None,
        }
        .is_expected());
        assert!(!AwsError::NetworkError {
            service: "route53".into(),
            detail: "x".into(),
        }
        .is_expected());
    }
}
