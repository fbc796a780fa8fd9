//! Utilities shared by the service clients.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

use crate::error::AwsError;

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with the shared timeout configuration.
pub(crate) fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256, used by the SigV4 signing key derivation.
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============ Timestamps ============

/// Current UTC time in SigV4 `YYYYMMDD'T'HHMMSS'Z'` form.
pub(crate) fn amz_date_now() -> String {
    chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string()
}

// ============ Name handling ============

/// Strip the trailing root dot and lowercase a domain name.
#[must_use]
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Decode Route 53 octal escapes in record names (`\052` for `*`, etc.).
#[must_use]
pub fn decode_record_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = tail
            .get(..3)
            .and_then(|digits| u32::from_str_radix(digits, 8).ok())
            .and_then(char::from_u32);
        if let Some(c) = decoded {
            out.push(c);
            rest = &tail[3..];
        } else {
            out.push('\\');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

// ============ XML ============

/// Escape text for inclusion in an XML element body.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============ Error mapping ============

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error")]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Map a non-2xx API response body to a structured [`AwsError`].
///
/// All three services share the `<ErrorResponse><Error>` envelope; the error
/// code vocabulary is mapped here so clients get uniform variants.
pub(crate) fn map_api_error(
    service: &str,
    status: u16,
    body: &str,
    zone_hint: Option<&str>,
) -> AwsError {
    let Ok(parsed) = quick_xml::de::from_str::<ErrorResponse>(body) else {
        return AwsError::Unknown {
            service: service.to_string(),
            raw_code: None,
            raw_message: format!("HTTP {status}: {}", truncate(body, 300)),
        };
    };

    let code = parsed.error.code;
    let message = parsed.error.message;

    match code.as_str() {
        "Throttling" | "ThrottlingException" | "PriorRequestNotComplete"
        | "RequestLimitExceeded" => AwsError::Throttling {
            service: service.to_string(),
            retry_after: None,
            raw_message: message,
        },
        "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" => {
            AwsError::AccessDenied {
                service: service.to_string(),
                raw_message: message,
            }
        }
        "InvalidClientTokenId" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"
        | "ExpiredToken" | "ExpiredTokenException" | "AuthFailure" => {
            AwsError::InvalidCredentials {
                service: service.to_string(),
                raw_message: message,
            }
        }
        "NoSuchHostedZone" => AwsError::ZoneNotFound {
            service: service.to_string(),
            zone_id: zone_hint.unwrap_or_default().to_string(),
            raw_message: message,
        },
        "InvalidChangeBatch" => AwsError::ChangeBatchRejected {
            service: service.to_string(),
            detail: message.unwrap_or_default(),
        },
        "InvalidInput" | "InvalidArgument" | "ValidationError" | "MalformedXML" => {
            AwsError::InvalidInput {
                service: service.to_string(),
                detail: message.unwrap_or_default(),
            }
        }
        _ => AwsError::Unknown {
            service: service.to_string(),
            raw_code: Some(code),
            raw_message: message.unwrap_or_else(|| format!("HTTP {status}")),
        },
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
