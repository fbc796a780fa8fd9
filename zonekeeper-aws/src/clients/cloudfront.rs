//! CloudFront client: distribution listing for one account context.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clients::common::{amz_date_now, create_http_client, map_api_error};
use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::sign::RequestSigner;
use crate::traits::DistributionSource;
use crate::types::DistributionSummary;

const SERVICE: &str = "cloudfront";
const HOST: &str = "cloudfront.amazonaws.com";
const API_VERSION: &str = "2020-05-31";
/// CloudFront is a global service; SigV4 scope is always us-east-1.
const SIGNING_REGION: &str = "us-east-1";
const MAX_RETRIES: u32 = 3;
const MAX_ITEMS: u32 = 100;

/// Client for the CloudFront REST API, scoped to one account's credentials.
pub struct CloudFrontClient {
    client: Client,
    signer: RequestSigner,
}

// ============ Wire types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    is_truncated: bool,
    next_marker: Option<String>,
    #[serde(default)]
    items: DistributionItems,
}

#[derive(Debug, Default, Deserialize)]
struct DistributionItems {
    #[serde(rename = "DistributionSummary", default)]
    items: Vec<DistributionSummaryXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionSummaryXml {
    id: String,
    domain_name: String,
    #[serde(default)]
    aliases: AliasesXml,
    enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct AliasesXml {
    #[serde(rename = "Items", default)]
    items: AliasItems,
}

#[derive(Debug, Default, Deserialize)]
struct AliasItems {
    #[serde(rename = "CNAME", default)]
    cnames: Vec<String>,
}

impl From<DistributionSummaryXml> for DistributionSummary {
    fn from(xml: DistributionSummaryXml) -> Self {
        Self {
            id: xml.id,
            domain_name: xml.domain_name,
            aliases: xml.aliases.items.cnames,
            enabled: xml.enabled,
        }
    }
}

impl CloudFrontClient {
    #[must_use]
    pub fn new(credentials: AwsCredentials) -> Self {
        Self {
            client: create_http_client(),
            signer: RequestSigner::new(credentials, SIGNING_REGION, SERVICE),
        }
    }

    async fn list_page(&self, marker: Option<&str>) -> Result<DistributionList> {
        let uri = format!("/{API_VERSION}/distribution");
        let mut params: Vec<String> = vec![format!("MaxItems={MAX_ITEMS}")];
        if let Some(marker) = marker {
            params.push(format!("Marker={}", urlencoding::encode(marker)));
        }
        params.sort_unstable();
        let query = params.join("&");

        let amz_date = amz_date_now();
        let signed = self.signer.sign("GET", HOST, &uri, &query, "", &amz_date);

        let mut req = self.client.get(format!("https://{HOST}{uri}?{query}"));
        for (k, v) in &signed.headers {
            req = req.header(k, v);
        }

        let (status, body) =
            HttpUtils::execute_request_with_retry(req, SERVICE, "GET", &uri, MAX_RETRIES).await?;
        if status >= 400 {
            return Err(map_api_error(SERVICE, status, &body, None));
        }
        HttpUtils::parse_xml(&body, SERVICE)
    }

    /// List every distribution in the account, following pagination.
    pub async fn list_all_distributions(&self) -> Result<Vec<DistributionSummary>> {
        let mut distributions = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_page(marker.as_deref()).await?;
            distributions.extend(page.items.items.into_iter().map(DistributionSummary::from));

            if !page.is_truncated {
                break;
            }
            if page.next_marker.is_none() {
                log::warn!("[{SERVICE}] Truncated response without NextMarker, stopping");
                break;
            }
            marker = page.next_marker;
        }

        log::debug!("[{SERVICE}] Listed {} distributions", distributions.len());
        Ok(distributions)
    }
}

#[async_trait]
impl DistributionSource for CloudFrontClient {
    async fn list_distributions(&self) -> Result<Vec<DistributionSummary>> {
        self.list_all_distributions().await
    }
}
