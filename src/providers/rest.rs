//! Search provider backed by a JSON REST endpoint
//!
//! The endpoint receives one POST per region:
//!
//! ```json
//! { "query": "...", "market": "de-DE", "count": 10, "freshness": "month" }
//! ```
//!
//! and answers with findings text and citations. Citations may appear at the
//! top level or nested under `search_results`; both are accepted.

use crate::providers::{clamp_count, region_query_text, SearchProvider, SearchResponse};
use crate::types::{Citation, ProviderError, QueryParams};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;

pub struct RestSearchProvider {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RestSearchProvider {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchProvider for RestSearchProvider {
    async fn search(
        &self,
        subject: &str,
        region: &str,
        params: &QueryParams,
    ) -> Result<SearchResponse, ProviderError> {
        let body = json!({
            "query": region_query_text(subject, region, params),
            "market": region,
            "count": clamp_count(params.count),
            "freshness": params.freshness.as_str(),
        });

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parse_search_payload(&payload)
    }

    fn name(&self) -> &str {
        "rest"
    }
}

/// Normalize a search endpoint payload
fn parse_search_payload(payload: &Value) -> Result<SearchResponse, ProviderError> {
    if !payload.is_object() {
        return Err(ProviderError::InvalidResponse(
            "expected a JSON object".to_string(),
        ));
    }

    if payload.get("status").and_then(Value::as_str) == Some("error") {
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("search backend reported an error");
        return Err(ProviderError::Unavailable(message.to_string()));
    }

    let text = ["text", "summary", "output_text"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| joined_result_content(payload))
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut citations = Vec::new();
    let sources = [
        payload.get("citations"),
        payload.get("search_results").and_then(|sr| sr.get("citations")),
    ];
    for list in sources.into_iter().flatten().filter_map(Value::as_array) {
        for entry in list {
            if let Some(citation) = parse_citation(entry) {
                if seen.insert(citation.url.clone()) {
                    citations.push(citation);
                }
            }
        }
    }

    Ok(SearchResponse { text, citations })
}

/// `results: [{"content": "..."}]` shape
fn joined_result_content(payload: &Value) -> Option<String> {
    let results = payload.get("results")?.as_array()?;
    let parts: Vec<&str> = results
        .iter()
        .filter_map(|r| r.get("content").and_then(Value::as_str))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn parse_citation(entry: &Value) -> Option<Citation> {
    let url = entry.get("url").and_then(Value::as_str)?.trim();
    if url.is_empty() {
        return None;
    }
    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(url);
    let offset = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    };

    Some(Citation::new(url, title).with_offsets(offset("start_index"), offset("end_index")))
}
