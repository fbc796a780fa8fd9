//! AWS credential material.

use serde::{Deserialize, Serialize};

use crate::error::{AwsError, Result};

/// A set of AWS API credentials.
///
/// Either long-lived access keys or temporary STS credentials (which carry a
/// session token). Session tokens are included in request signing when
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    /// Access key id (`AKIA...` or `ASIA...` for temporary keys).
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// STS session token, present only for temporary credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Create credentials from long-lived access keys.
    #[must_use]
    pub fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            session_token: None,
        }
    }

    /// Create temporary credentials including a session token.
    #[must_use]
    pub fn with_session(
        access_key_id: String,
        secret_access_key: String,
        session_token: String,
    ) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            session_token: Some(session_token),
        }
    }

    /// Load credentials from the standard `AWS_ACCESS_KEY_ID` /
    /// `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN` environment variables.
    pub fn from_env() -> Result<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| missing_env())?;
        let secret_access_key =
            std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| missing_env())?;
        if access_key_id.trim().is_empty() || secret_access_key.trim().is_empty() {
            return Err(missing_env());
        }
        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
        })
    }
}

fn missing_env() -> AwsError {
    AwsError::InvalidCredentials {
        service: "credentials".to_string(),
        raw_message: Some(
            "AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set in environment".to_string(),
        ),
    }
}
