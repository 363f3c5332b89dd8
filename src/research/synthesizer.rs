//! Cross-Region Synthesizer
//!
//! Composes one context document from the aggregated findings, asks the
//! [`SynthesisProvider`] for a narrative exactly once, and assembles the
//! final [`WorkflowReport`]. Failed regions are written into the context so
//! the narrative can call out data gaps.

use crate::providers::SynthesisProvider;
use crate::research::task::elapsed_millis;
use crate::types::{AggregatedResult, RegionSummary, WorkflowError, WorkflowReport};
use chrono::Utc;
use std::fmt::Write;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

pub struct Synthesizer {
    provider: Arc<dyn SynthesisProvider>,
}

impl Synthesizer {
    pub fn new(provider: Arc<dyn SynthesisProvider>) -> Self {
        Self { provider }
    }

    /// Build the per-region context handed to the synthesis provider
    pub fn build_context(subject: &str, aggregated: &AggregatedResult) -> String {
        let mut context = String::new();

        let list_or_none = |regions: &[String]| {
            if regions.is_empty() {
                "None".to_string()
            } else {
                regions.join(", ")
            }
        };

        // Writing into a String cannot fail
        let _ = writeln!(context, "## Subject: {}", subject);
        let _ = writeln!(context);
        let _ = writeln!(context, "## Search Results Summary");
        let _ = writeln!(
            context,
            "- **Successful Markets ({}):** {}",
            aggregated.successful_regions.len(),
            list_or_none(&aggregated.successful_regions)
        );
        let _ = writeln!(
            context,
            "- **Failed Markets ({}):** {}",
            aggregated.failed_regions.len(),
            list_or_none(&aggregated.failed_regions)
        );
        let _ = writeln!(
            context,
            "- **Total Citations Found:** {}",
            aggregated.deduped_citations.len()
        );
        let _ = writeln!(context);
        let _ = writeln!(context, "## Market-Specific Findings");

        for outcome in &aggregated.all_outcomes {
            let _ = writeln!(context);
            if outcome.is_success() {
                let _ = writeln!(
                    context,
                    "### {} - SUCCESS ({} sources found)",
                    outcome.region(),
                    outcome.citations().len()
                );
                let _ = writeln!(context, "**Execution Time:** {}ms", outcome.elapsed_millis());
                let _ = writeln!(context);
                let _ = writeln!(context, "**Findings:**");
                let _ = writeln!(context, "{}", outcome.text().trim());
            } else {
                let status = outcome.status().as_str();
                let _ = writeln!(
                    context,
                    "### {} - {}",
                    outcome.region(),
                    status.to_uppercase()
                );
                let _ = writeln!(context, "**Status:** {}", status);
                let _ = writeln!(
                    context,
                    "**Error:** {}",
                    outcome.error_message().unwrap_or("Unknown error")
                );
                let _ = writeln!(context, "**Execution Time:** {}ms", outcome.elapsed_millis());
                let _ = writeln!(context);
                let _ = writeln!(context, "*No data available for this market.*");
            }
            let _ = writeln!(context);
            let _ = writeln!(context, "---");
        }

        context
    }

    /// Invoke the synthesis provider once and assemble the report.
    ///
    /// `started` marks the beginning of the run so the report can carry the
    /// wall-clock duration alongside the cumulative per-region time.
    pub async fn synthesize(
        &self,
        run_id: Uuid,
        subject: &str,
        aggregated: AggregatedResult,
        started: Instant,
    ) -> Result<WorkflowReport, WorkflowError> {
        let context = Self::build_context(subject, &aggregated);

        info!(
            provider = self.provider.name(),
            context_chars = context.len(),
            "Requesting cross-region synthesis"
        );

        let narrative_text = self
            .provider
            .synthesize(subject, &context)
            .await
            .map_err(|e| {
                error!("Synthesis provider failed: {}", e);
                WorkflowError::Synthesis(e)
            })?;

        let per_region_summary = aggregated
            .all_outcomes
            .iter()
            .map(RegionSummary::from)
            .collect();

        Ok(WorkflowReport {
            run_id,
            subject: subject.to_string(),
            narrative_text,
            citations: aggregated.deduped_citations,
            successful_regions: aggregated.successful_regions,
            failed_regions: aggregated.failed_regions,
            total_elapsed_millis: aggregated.total_elapsed_millis,
            wall_clock_millis: elapsed_millis(started),
            per_region_summary,
            generated_at: Utc::now(),
        })
    }
}
