//! Multi-Region Research Workflow
//!
//! Fans a subject out to independent per-market searches, collects their
//! outcomes, and asks a synthesis provider for one cross-market narrative.
//!
//! # Architecture
//!
//! - [`task::RegionSearchTask`] - one market's search, bounded by its own timeout
//! - [`dispatcher::Dispatcher`] - runs tasks with bounded concurrency and an overall deadline
//! - [`aggregator::aggregate`] - partitions outcomes and deduplicates citations
//! - [`synthesizer::Synthesizer`] - builds the context and calls the synthesis provider once
//! - [`coordinator::ResearchCoordinator`] - wires the stages together
//!
//! # Usage
//!
//! ```ignore
//! use marketlens::research::{ResearchCoordinator, WorkflowOptions};
//!
//! let coordinator = ResearchCoordinator::new(search_provider, synthesis_provider);
//! let regions = vec!["en-US".to_string(), "de-DE".to_string(), "ja-JP".to_string()];
//!
//! let report = coordinator
//!     .run_workflow("Contoso Ltd", &regions, WorkflowOptions::default(), None)
//!     .await?;
//!
//! println!("{}", report.narrative_text);
//! for citation in report.citations {
//!     println!("- {}", citation.url);
//! }
//! ```
//!
//! # Failure model
//!
//! Region failures (provider errors, panics, timeouts) are recorded as
//! outcomes and never abort the run. Only a synthesis failure is returned as
//! a [`crate::types::WorkflowError`].

/// Result aggregation and citation deduplication.
pub mod aggregator;
/// Workflow entry point and run options.
pub mod coordinator;
/// Bounded-concurrency fan-out of region tasks.
pub mod dispatcher;
/// Supported market codes.
pub mod markets;
/// Progress notifications.
pub mod progress;
/// Cross-region synthesis.
pub mod synthesizer;
/// Single-region search task.
pub mod task;

pub use coordinator::{ResearchCoordinator, WorkflowOptions};
pub use progress::{ProgressSink, WorkflowStage};
