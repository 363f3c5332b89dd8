//! # marketlens
//!
//! Multi-market company risk research. A subject (usually a company name) is
//! searched in several markets at once, each market with its own timeout, and
//! the findings that came back are synthesized into one cross-market
//! analysis with deduplicated sources.
//!
//! marketlens can be used in two ways:
//!
//! 1. **As a command-line tool** - run the `marketlens` binary
//! 2. **As a library** - embed the workflow engine with your own providers
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use marketlens::llm::Provider;
//! use marketlens::providers::{LlmSynthesisProvider, WebSearchProvider};
//! use marketlens::research::{ResearchCoordinator, WorkflowOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = Provider::Ollama {
//!         base_url: "http://localhost:11434".to_string(),
//!         model: "llama3.2:3b".to_string(),
//!     }
//!     .create_client()?;
//!
//!     let coordinator = ResearchCoordinator::new(
//!         Arc::new(WebSearchProvider::new()),
//!         Arc::new(LlmSynthesisProvider::new(llm)),
//!     );
//!
//!     let regions = vec!["en-US".to_string(), "de-DE".to_string(), "ja-JP".to_string()];
//!     let report = coordinator
//!         .run_workflow("Contoso Ltd", &regions, WorkflowOptions::default(), None)
//!         .await?;
//!
//!     println!("{}", report.narrative_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `minimal` | No optional providers |
//!
//! ## Modules
//!
//! - [`research`] - Region tasks, dispatcher, aggregator, synthesizer and entry point
//! - [`providers`] - Search and synthesis provider traits and adapters
//! - [`llm`] - LLM client implementations
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading
//! - [`cli`] - Command-line interface

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line parsing, output and project scaffolding.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Search and synthesis providers.
pub mod providers;
/// Multi-region research workflow.
pub mod research;
/// Core types (queries, outcomes, reports, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, Provider};
pub use providers::{SearchProvider, SearchResponse, SynthesisProvider};
pub use research::{ProgressSink, ResearchCoordinator, WorkflowOptions, WorkflowStage};
pub use types::{
    AggregatedResult, AppError, Citation, ProviderError, QueryParams, RegionOutcome,
    RegionOutcomeStatus, Result, WorkflowError, WorkflowReport,
};
pub use utils::toml_config::MarketlensConfig;
