//! Shared HTTP request plumbing.
//!
//! Each client constructs and signs its own `RequestBuilder`; this module
//! unifies sending, logging, status triage and response parsing.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::AwsError;

/// HTTP helper functions.
pub struct HttpUtils;

impl HttpUtils {
    /// Perform an HTTP request and return `(status, body)`.
    ///
    /// HTTP 429 maps to [`AwsError::Throttling`], 502..=504 to
    /// [`AwsError::NetworkError`]; other statuses are returned to the caller
    /// for service-specific error mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        service: &str,
        method_name: &str,
        action: &str,
    ) -> Result<(u16, String), AwsError> {
        log::debug!("[{service}] {method_name} {action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AwsError::Timeout {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            } else {
                AwsError::NetworkError {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{service}] Response status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Throttled (HTTP 429), retry_after={retry_after:?}");
            return Err(AwsError::Throttling {
                service: service.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Server error (HTTP {status_code})");
            return Err(AwsError::NetworkError {
                service: service.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response.text().await.map_err(|e| AwsError::NetworkError {
            service: service.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;

        Ok((status_code, response_text))
    }

    /// Perform an HTTP request with exponential-backoff retries on transient
    /// errors (network, timeout, throttling). Business errors are returned
    /// immediately.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        service: &str,
        method_name: &str,
        action: &str,
        max_retries: u32,
    ) -> Result<(u16, String), AwsError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, service, method_name, action).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use; retries need a clone.
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{service}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, service, method_name, action).await;
            };

            match Self::execute_request(req, service, method_name, action).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        service,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AwsError::NetworkError {
            service: service.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }

    /// Parse an XML response body.
    pub fn parse_xml<T>(response_text: &str, service: &str) -> Result<T, AwsError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(response_text).map_err(|e| {
            log::error!("[{service}] XML parse failed: {e}");
            AwsError::ParseError {
                service: service.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// Retry delay: honor `retry_after` from throttling responses (capped at
/// 30s), exponential backoff otherwise.
fn retry_delay(error: &AwsError, attempt: u32) -> Duration {
    if let AwsError::Throttling {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, ... capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
