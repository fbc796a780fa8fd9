//! AWS Signature Version 4 request signing.
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::clients::common::hmac_sha256;
use crate::credentials::AwsCredentials;

/// Signs requests for one AWS service endpoint.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: AwsCredentials,
    region: String,
    service: String,
}

/// Headers produced by signing, ready to attach to the outgoing request.
#[derive(Debug)]
pub struct SignedHeaders {
    pub headers: Vec<(String, String)>,
}

impl RequestSigner {
    #[must_use]
    pub fn new(credentials: AwsCredentials, region: &str, service: &str) -> Self {
        Self {
            credentials,
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Sign a request and return the full header set to attach: `host`,
    /// `x-amz-date`, `x-amz-content-sha256`, `x-amz-security-token` (when the
    /// credentials are temporary) and `authorization`.
    ///
    /// `amz_date` is the request timestamp in `YYYYMMDD'T'HHMMSS'Z'` form;
    /// `canonical_query` must already be percent-encoded.
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        uri: &str,
        canonical_query: &str,
        payload: &str,
        amz_date: &str,
    ) -> SignedHeaders {
        let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));

        // Headers participating in the signature, sorted by lowercase name.
        let mut headers: Vec<(String, String)> = vec![
            ("host".to_string(), host.to_string()),
            ("x-amz-content-sha256".to_string(), hashed_payload.clone()),
            ("x-amz-date".to_string(), amz_date.to_string()),
        ];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers: String = headers.iter().fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{}", v.trim());
            acc
        });
        let signed_headers: String = headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let sorted_query = sort_query(canonical_query);

        let canonical_request = format!(
            "{method}\n{uri}\n{sorted_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
        );

        log::trace!("CanonicalRequest:\n{canonical_request}");

        let date = &amz_date[..8];
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign =
            format!("AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{hashed_canonical_request}");

        log::trace!("StringToSign:\n{string_to_sign}");

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(date),
            string_to_sign.as_bytes(),
        ));

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );

        let mut out = headers;
        out.push(("authorization".to_string(), authorization));
        SignedHeaders { headers: out }
    }

    /// Derive the signing key: date -> region -> service -> `aws4_request`.
    fn signing_key(&self, date: &str) -> Vec<u8> {
        let k_secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(k_secret.as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

/// Sort query parameters by name (ascending byte order), as the canonical
/// request requires. Parameters must already be percent-encoded.
fn sort_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }
    let mut params: Vec<&str> = query.split('&').collect();
    params.sort_unstable();
    params.join("&")
}
