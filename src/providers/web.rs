//! Web search provider using daedra
//!
//! daedra queries DuckDuckGo, which has no notion of the market codes used by
//! the workflow, so the region is carried inside the query text instead.

use crate::providers::{clamp_count, region_query_text, SearchProvider, SearchResponse};
use crate::types::{Citation, ProviderError, QueryParams};
use async_trait::async_trait;

/// Web search provider powered by daedra
pub struct WebSearchProvider;

impl WebSearchProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    async fn search(
        &self,
        subject: &str,
        region: &str,
        params: &QueryParams,
    ) -> Result<SearchResponse, ProviderError> {
        let query = region_query_text(subject, region, params);

        let search_args = daedra::SearchArgs {
            query: query.clone(),
            options: Some(daedra::SearchOptions {
                num_results: clamp_count(params.count),
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| ProviderError::Request(format!("Search failed: {}", e)))?;

        let rows: Vec<ResultRow<'_>> = response.data.iter().map(ResultRow::from).collect();

        Ok(summarize_results(&query, &rows))
    }

    fn name(&self) -> &str {
        "web"
    }
}

/// Borrowed view of one daedra hit
struct ResultRow<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
}

impl<'a> From<&'a daedra::types::SearchResult> for ResultRow<'a> {
    fn from(result: &'a daedra::types::SearchResult) -> Self {
        Self {
            title: &result.title,
            url: &result.url,
            description: &result.description,
        }
    }
}

/// Turn result rows into findings text plus citations
fn summarize_results(query: &str, rows: &[ResultRow<'_>]) -> SearchResponse {
    if rows.is_empty() {
        return SearchResponse {
            text: format!("No results found for \"{}\".", query),
            citations: Vec::new(),
        };
    }

    let mut lines = vec![format!("Results for \"{}\":", query)];
    let mut citations = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        lines.push(format!("{}. {} - {}", i + 1, row.title, row.description.trim()));

        let url = row.url.trim();
        if !url.is_empty() {
            let title = if row.title.is_empty() { url } else { row.title };
            citations.push(Citation::new(url, title));
        }
    }

    SearchResponse {
        text: lines.join("\n"),
        citations,
    }
}
