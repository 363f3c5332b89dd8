//! External capabilities consumed by the research workflow
//!
//! The workflow engine never talks to a search backend or a language model
//! directly. It sees two narrow traits:
//!
//! - [`SearchProvider`] - looks up findings for one subject in one region
//! - [`SynthesisProvider`] - turns the composed per-region context into prose
//!
//! # Adapters
//!
//! - [`web::WebSearchProvider`] - DuckDuckGo search via daedra
//! - [`rest::RestSearchProvider`] - JSON search REST endpoint
//! - [`llm::LlmSynthesisProvider`] - cross-market analyst prompt over any [`crate::llm::LLMClient`]
//!
//! Adapters normalize whatever their backend returns into [`SearchResponse`]
//! and [`Citation`] values; the engine only ever sees that shape.

/// Cross-market synthesis backed by an LLM client.
pub mod llm;
/// Search over a JSON REST endpoint.
pub mod rest;
/// Web search through daedra.
pub mod web;

use crate::types::{Citation, ProviderError, QueryParams};
use async_trait::async_trait;

pub use llm::LlmSynthesisProvider;
pub use rest::RestSearchProvider;
pub use web::WebSearchProvider;

/// Findings for one region as returned by a search provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Looks up information about a subject within one region.
///
/// Implementations must be safe to call concurrently for different regions.
/// They do not need to enforce any timeout: the engine races every call
/// against its own timer and cancels it when the workflow gives up.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        subject: &str,
        region: &str,
        params: &QueryParams,
    ) -> Result<SearchResponse, ProviderError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Produces the final narrative from the composed per-region context
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    async fn synthesize(&self, subject: &str, context: &str) -> Result<String, ProviderError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Market-specific search instruction shared by the search adapters
pub fn region_query_text(subject: &str, region: &str, params: &QueryParams) -> String {
    format!(
        "{} in the {} market, past {}",
        params.focus.search_phrase(subject),
        region,
        params.freshness.as_str()
    )
}

/// Keeps a requested result count inside what search backends accept
pub(crate) fn clamp_count(count: usize) -> usize {
    count.clamp(1, 50)
}
