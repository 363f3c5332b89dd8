//! LLM Provider Clients
//!
//! The synthesis step of the research workflow asks a language model for one
//! cross-market analysis per run. This module hides the concrete backend
//! behind [`LLMClient`].
//!
//! # Supported Providers
//!
//! - `ollama` - Local Ollama server (Cargo feature, enabled by default)
//! - OpenAI-compatible chat completions endpoints (always available)
//!
//! # Example
//!
//! ```ignore
//! use marketlens::llm::Provider;
//!
//! let provider = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2".to_string(),
//! };
//! let client = provider.create_client()?;
//! let text = client.generate("What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// OpenAI-compatible chat completions over HTTP.
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, Provider};
