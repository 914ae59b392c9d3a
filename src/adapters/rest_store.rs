use crate::core::{InsertOutcome, ScholarshipRecord, ScholarshipStore};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Bulk inserts into a PostgREST-style table endpoint (`{endpoint}/rest/v1/{table}`).
pub struct RestStore {
    client: Client,
    endpoint: String,
    table: String,
    api_key: Option<String>,
    upsert: bool,
    timeout: Option<Duration>,
}

impl RestStore {
    pub fn new(endpoint: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            table: table.into(),
            api_key: None,
            upsert: false,
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn insert_url(&self) -> String {
        let base = format!(
            "{}/rest/v1/{}",
            self.endpoint.trim_end_matches('/'),
            self.table
        );
        if self.upsert {
            format!("{}?on_conflict=id", base)
        } else {
            base
        }
    }

    fn prefer_header(&self) -> &'static str {
        if self.upsert {
            "resolution=merge-duplicates,return=minimal"
        } else {
            "return=minimal"
        }
    }
}

#[async_trait::async_trait]
impl ScholarshipStore for RestStore {
    async fn bulk_insert(&self, records: &[ScholarshipRecord]) -> Result<InsertOutcome> {
        let url = self.insert_url();
        tracing::debug!("POST {} ({} records)", url, records.len());

        let mut request = self
            .client
            .post(&url)
            .header("Prefer", self.prefer_header())
            .json(records);

        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Store response status: {}", status);

        if status.is_success() {
            return Ok(InsertOutcome::ok());
        }

        let body = response.text().await?;
        Ok(match error_message(&body) {
            Some(message) => InsertOutcome::failed(message),
            None => InsertOutcome::failed_without_message(),
        })
    }
}

/// The `message` of a JSON error body, else the raw body, else nothing.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

    Some(from_json.unwrap_or_else(|| body.to_string()))
}
