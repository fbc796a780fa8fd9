//! Route 53 client: zone snapshot reads, batched deletions, change polling.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clients::common::{
    amz_date_now, create_http_client, decode_record_name, map_api_error, xml_escape,
};
use crate::credentials::AwsCredentials;
use crate::error::{AwsError, Result};
use crate::http_client::HttpUtils;
use crate::sign::RequestSigner;
use crate::traits::ZoneStore;
use crate::types::{AliasTarget, ChangeBatch, ChangeInfo, ChangeStatus, RecordType, ZoneRecord};

const SERVICE: &str = "route53";
const HOST: &str = "route53.amazonaws.com";
const API_VERSION: &str = "2013-04-01";
/// Route 53 is a global service; SigV4 scope is always us-east-1.
const SIGNING_REGION: &str = "us-east-1";
const MAX_RETRIES: u32 = 3;
/// `ListResourceRecordSets` page size ceiling.
const MAX_ITEMS: u32 = 300;
/// Interval between `GetChange` polls while waiting for propagation.
const CHANGE_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Client for the Route 53 REST API.
pub struct Route53Client {
    client: Client,
    signer: RequestSigner,
}

// ============ Wire types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListResourceRecordSetsResponse {
    resource_record_sets: ResourceRecordSets,
    is_truncated: bool,
    next_record_name: Option<String>,
    next_record_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceRecordSets {
    #[serde(rename = "ResourceRecordSet", default)]
    items: Vec<ResourceRecordSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceRecordSet {
    name: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "TTL")]
    ttl: Option<u32>,
    resource_records: Option<ResourceRecords>,
    alias_target: Option<AliasTargetXml>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    items: Vec<ResourceRecordValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceRecordValue {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AliasTargetXml {
    hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    dns_name: String,
    evaluate_target_health: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeResponse {
    change_info: ChangeInfoXml,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeInfoXml {
    id: String,
    status: String,
}

impl From<ChangeInfoXml> for ChangeInfo {
    fn from(xml: ChangeInfoXml) -> Self {
        Self {
            id: xml.id.trim_start_matches("/change/").to_string(),
            status: ChangeStatus::parse(&xml.status),
        }
    }
}

fn rrset_to_record(rrset: ResourceRecordSet) -> ZoneRecord {
    ZoneRecord {
        name: decode_record_name(&rrset.name),
        record_type: RecordType::parse(&rrset.record_type),
        ttl: rrset.ttl,
        alias_target: rrset.alias_target.map(|a| AliasTarget {
            hosted_zone_id: a.hosted_zone_id,
            dns_name: a.dns_name,
            evaluate_target_health: a.evaluate_target_health,
        }),
        values: rrset
            .resource_records
            .map(|rs| rs.items.into_iter().map(|r| r.value).collect())
            .unwrap_or_default(),
    }
}

/// Accept both `Z123...` and the `/hostedzone/Z123...` form.
fn normalize_zone_id(zone_id: &str) -> &str {
    zone_id.trim_start_matches("/hostedzone/")
}

/// Render a change batch as a `ChangeResourceRecordSetsRequest` body.
///
/// DELETE changes must reproduce the record exactly as it exists in the
/// zone, alias target or rdata included.
fn change_batch_to_xml(batch: &ChangeBatch) -> String {
    let mut xml = String::with_capacity(256 + batch.changes.len() * 256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = write!(
        xml,
        r#"<ChangeResourceRecordSetsRequest xmlns="https://route53.amazonaws.com/doc/{API_VERSION}/"><ChangeBatch><Comment>{}</Comment><Changes>"#,
        xml_escape(&batch.comment)
    );
    for record in &batch.changes {
        let _ = write!(
            xml,
            "<Change><Action>DELETE</Action><ResourceRecordSet><Name>{}</Name><Type>{}</Type>",
            xml_escape(&record.name),
            xml_escape(record.record_type.as_str())
        );
        if let Some(alias) = &record.alias_target {
            let _ = write!(
                xml,
                "<AliasTarget><HostedZoneId>{}</HostedZoneId><DNSName>{}</DNSName><EvaluateTargetHealth>{}</EvaluateTargetHealth></AliasTarget>",
                xml_escape(&alias.hosted_zone_id),
                xml_escape(&alias.dns_name),
                alias.evaluate_target_health
            );
        } else {
            if let Some(ttl) = record.ttl {
                let _ = write!(xml, "<TTL>{ttl}</TTL>");
            }
            xml.push_str("<ResourceRecords>");
            for value in &record.values {
                let _ = write!(
                    xml,
                    "<ResourceRecord><Value>{}</Value></ResourceRecord>",
                    xml_escape(value)
                );
            }
            xml.push_str("</ResourceRecords>");
        }
        xml.push_str("</ResourceRecordSet></Change>");
    }
    xml.push_str("</Changes></ChangeBatch></ChangeResourceRecordSetsRequest>");
    xml
}

impl Route53Client {
    #[must_use]
    pub fn new(credentials: AwsCredentials) -> Self {
        Self {
            client: create_http_client(),
            signer: RequestSigner::new(credentials, SIGNING_REGION, SERVICE),
        }
    }

    /// Signed GET; `query` must already be percent-encoded.
    async fn get(&self, uri: &str, query: &str, zone_hint: Option<&str>) -> Result<String> {
        let amz_date = amz_date_now();
        let signed = self.signer.sign("GET", HOST, uri, query, "", &amz_date);

        let url = if query.is_empty() {
            format!("https://{HOST}{uri}")
        } else {
            format!("https://{HOST}{uri}?{query}")
        };
        let mut req = self.client.get(&url);
        for (k, v) in &signed.headers {
            req = req.header(k, v);
        }

        let (status, body) =
            HttpUtils::execute_request_with_retry(req, SERVICE, "GET", uri, MAX_RETRIES).await?;
        if status >= 400 {
            return Err(map_api_error(SERVICE, status, &body, zone_hint));
        }
        Ok(body)
    }

    /// Signed POST with an XML body.
    async fn post(&self, uri: &str, payload: &str, zone_hint: Option<&str>) -> Result<String> {
        let amz_date = amz_date_now();
        let signed = self.signer.sign("POST", HOST, uri, "", payload, &amz_date);

        let mut req = self
            .client
            .post(format!("https://{HOST}{uri}"))
            .header("content-type", "text/xml")
            .body(payload.to_string());
        for (k, v) in &signed.headers {
            req = req.header(k, v);
        }

        let (status, body) =
            HttpUtils::execute_request_with_retry(req, SERVICE, "POST", uri, MAX_RETRIES).await?;
        if status >= 400 {
            return Err(map_api_error(SERVICE, status, &body, zone_hint));
        }
        Ok(body)
    }

    /// Fetch one page of record sets.
    async fn list_records_page(
        &self,
        zone_id: &str,
        start_name: Option<&str>,
        start_type: Option<&str>,
    ) -> Result<ListResourceRecordSetsResponse> {
        let uri = format!("/{API_VERSION}/hostedzone/{zone_id}/rrset");
        let mut params: Vec<String> = vec![format!("maxitems={MAX_ITEMS}")];
        if let Some(name) = start_name {
            params.push(format!("name={}", urlencoding::encode(name)));
        }
        if let Some(record_type) = start_type {
            params.push(format!("type={}", urlencoding::encode(record_type)));
        }
        params.sort_unstable();
        let query = params.join("&");

        let body = self.get(&uri, &query, Some(zone_id)).await?;
        HttpUtils::parse_xml(&body, SERVICE)
    }

    /// Fetch the complete record set of a zone as one ordered sequence.
    pub async fn list_all_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        let zone_id = normalize_zone_id(zone_id);
        let mut records = Vec::new();
        let mut start_name: Option<String> = None;
        let mut start_type: Option<String> = None;

        loop {
            let page = self
                .list_records_page(zone_id, start_name.as_deref(), start_type.as_deref())
                .await?;
            records.extend(page.resource_record_sets.items.into_iter().map(rrset_to_record));

            if !page.is_truncated {
                break;
            }
            // A truncated response without markers would loop forever.
            if page.next_record_name.is_none() {
                log::warn!("[{SERVICE}] Truncated response without NextRecordName, stopping");
                break;
            }
            start_name = page.next_record_name;
            start_type = page.next_record_type;
        }

        log::info!(
            "[{SERVICE}] Fetched {} record sets from zone {zone_id}",
            records.len()
        );
        Ok(records)
    }

    /// Submit a deletion batch and return the pending change handle.
    pub async fn change_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo> {
        let zone_id = normalize_zone_id(zone_id);
        let uri = format!("/{API_VERSION}/hostedzone/{zone_id}/rrset/");
        let payload = change_batch_to_xml(batch);

        let body = self.post(&uri, &payload, Some(zone_id)).await?;
        let parsed: ChangeResponse = HttpUtils::parse_xml(&body, SERVICE)?;
        Ok(parsed.change_info.into())
    }

    /// Fetch the current status of a submitted change.
    pub async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let change_id = change_id.trim_start_matches("/change/");
        let uri = format!("/{API_VERSION}/change/{change_id}");
        let body = self.get(&uri, "", None).await?;
        let parsed: ChangeResponse = HttpUtils::parse_xml(&body, SERVICE)?;
        Ok(parsed.change_info.into())
    }
}

#[async_trait]
impl ZoneStore for Route53Client {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        self.list_all_records(zone_id).await
    }

    async fn submit_deletions(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        self.change_record_sets(zone_id, batch).await
    }

    async fn wait_for_change(&self, change_id: &str, timeout: Duration) -> Result<ChangeInfo> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let info = self.get_change(change_id).await?;
            if info.status == ChangeStatus::InSync {
                return Ok(info);
            }
            if tokio::time::Instant::now() + CHANGE_POLL_INTERVAL > deadline {
                return Err(AwsError::Timeout {
                    service: SERVICE.to_string(),
                    detail: format!(
                        "change {change_id} not INSYNC after {}s",
                        timeout.as_secs()
                    ),
                });
            }
            tokio::time::sleep(CHANGE_POLL_INTERVAL).await;
        }
    }
}
