use crate::mapper;
use crate::models::Action;
use crate::record::LeadRecord;
use crate::store::traits::LeadStore;
use crate::store::types::BackendParams;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lead table on the hosted backend, reached through its REST interface
pub struct RestLeadStore {
    client: Client,
    params: BackendParams,
}

impl RestLeadStore {
    pub fn new(params: BackendParams) -> Result<Self> {
        if params.base_url.trim().is_empty() {
            bail!("Backend URL is empty");
        }

        let mut api_key = HeaderValue::from_str(&params.api_key).context("API key is not a valid header value")?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", params.api_key))
            .context("API key is not a valid header value")?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, params })
    }

    async fn ensure_success(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Backend returned status {} while trying to {}: {}", status, what, body);
        bail!("Failed to {}: {}", what, status);
    }
}

/// Query string for one page, ordered by id so pages do not overlap
fn page_query(offset: usize, limit: usize) -> [(&'static str, String); 4] {
    [
        ("select", "*".to_string()),
        ("order", "id.asc".to_string()),
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
    ]
}

/// Row count from a `Content-Range` header such as `0-999/1500`.
/// `*` (count not computed) gives `None`.
fn content_range_total(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

/// Offset of the next page, or `None` once every row has been read.
/// With a known total the server's own row cap cannot cut the table short;
/// without one a short page ends the scan.
fn next_offset(offset: usize, received: usize, page_size: usize, total: Option<usize>) -> Option<usize> {
    if received == 0 {
        return None;
    }
    let next = offset + received;
    match total {
        Some(total) => (next < total).then_some(next),
        None => (received >= page_size).then_some(next),
    }
}

#[async_trait]
impl LeadStore for RestLeadStore {
    async fn fetch_records(&self) -> Result<Vec<LeadRecord>> {
        let url = self.params.table_url();
        let page_size = self.params.page_size.max(1);
        let mut rows: Vec<Value> = Vec::new();
        let mut offset = 0;

        loop {
            debug!("Fetching URL: {} (offset {})", url, offset);
            let response = self
                .client
                .get(&url)
                .query(&page_query(offset, page_size))
                .header("Prefer", "count=exact")
                .send()
                .await
                .context("Failed to fetch leads")?;
            let response = Self::ensure_success(response, "fetch leads").await?;

            let total = response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(content_range_total);
            let page: Vec<Value> = response.json().await.context("Failed to read leads response body")?;
            let received = page.len();
            rows.extend(page);

            match next_offset(offset, received, page_size, total) {
                Some(next) => offset = next,
                None => break,
            }
        }

        let total = rows.len();
        let records: Vec<LeadRecord> = rows
            .into_iter()
            .filter(|row| row.is_object())
            .map(LeadRecord::from_value)
            .collect();

        if records.len() < total {
            warn!("Skipped {} rows that were not objects", total - records.len());
        }
        info!("Fetched {} leads from {}", records.len(), self.params.table);
        Ok(records)
    }

    async fn save_record(&self, record: &LeadRecord) -> Result<()> {
        let Some(id) = record.id.as_deref() else {
            bail!("Cannot save a lead without an id");
        };

        let response = self
            .client
            .post(self.params.table_url())
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[record])
            .send()
            .await
            .with_context(|| format!("Failed to save lead {}", id))?;
        Self::ensure_success(response, "save lead").await?;

        debug!("Saved lead {}", id);
        Ok(())
    }

    async fn save_action_history(&self, lead_id: &str, actions: &[Action]) -> Result<()> {
        let response = self
            .client
            .patch(self.params.table_url())
            .query(&[("id", format!("eq.{}", lead_id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "action_history": mapper::action_history_value(actions) }))
            .send()
            .await
            .with_context(|| format!("Failed to save action history of lead {}", lead_id))?;
        Self::ensure_success(response, "save action history").await?;

        debug!("Saved {} actions for lead {}", actions.len(), lead_id);
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "Backend"
    }
}
