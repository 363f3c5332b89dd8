use crate::{
    providers::{SearchProvider, SynthesisProvider},
    research::{
        aggregator::aggregate,
        dispatcher::Dispatcher,
        progress::{ProgressSink, WorkflowStage},
        synthesizer::Synthesizer,
    },
    types::{QueryParams, WorkflowError, WorkflowReport},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Timing, concurrency and query settings for one workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Upper bound for a single region's search
    pub region_timeout: Duration,
    /// Upper bound for the whole dispatch stage
    pub overall_timeout: Duration,
    /// Maximum number of region searches in flight at once
    pub max_concurrency: usize,
    pub params: QueryParams,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            region_timeout: Duration::from_secs(90),
            overall_timeout: Duration::from_secs(300),
            max_concurrency: 10,
            params: QueryParams::default(),
        }
    }
}

impl WorkflowOptions {
    pub fn with_region_timeout(mut self, timeout: Duration) -> Self {
        self.region_timeout = timeout;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    fn validate(&self) -> Result<(), WorkflowError> {
        if self.max_concurrency == 0 {
            return Err(WorkflowError::InvalidRequest(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.region_timeout.is_zero() || self.overall_timeout.is_zero() {
            return Err(WorkflowError::InvalidRequest(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runs the multi-region research workflow: dispatch, aggregate, synthesize.
pub struct ResearchCoordinator {
    search: Arc<dyn SearchProvider>,
    synthesis: Arc<dyn SynthesisProvider>,
}

impl ResearchCoordinator {
    pub fn new(search: Arc<dyn SearchProvider>, synthesis: Arc<dyn SynthesisProvider>) -> Self {
        Self { search, synthesis }
    }

    /// Execute one workflow run.
    ///
    /// Region failures are recorded in the report; only a synthesis failure
    /// (or a malformed request) is returned as an error.
    pub async fn run_workflow(
        &self,
        subject: &str,
        regions: &[String],
        options: WorkflowOptions,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<WorkflowReport, WorkflowError> {
        if subject.trim().is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "subject must not be empty".to_string(),
            ));
        }
        if regions.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "at least one region is required".to_string(),
            ));
        }
        options.validate()?;

        let run_id = Uuid::new_v4();
        let span = info_span!("workflow", %run_id, subject);

        async move {
            let started = Instant::now();
            info!(
                regions = regions.len(),
                search_provider = self.search.name(),
                synthesis_provider = self.synthesis.name(),
                "Starting research workflow"
            );

            notify_stage(progress, WorkflowStage::Dispatching);
            let dispatcher = Dispatcher::new(Arc::clone(&self.search), options);
            let outcomes = dispatcher.dispatch(subject, regions, progress).await;

            notify_stage(progress, WorkflowStage::Aggregating);
            let aggregated = aggregate(outcomes);
            info!(
                successful = aggregated.successful_regions.len(),
                failed = aggregated.failed_regions.len(),
                citations = aggregated.deduped_citations.len(),
                "Aggregated region outcomes"
            );

            notify_stage(progress, WorkflowStage::Synthesizing);
            let report = Synthesizer::new(Arc::clone(&self.synthesis))
                .synthesize(run_id, subject, aggregated, started)
                .await?;

            info!(
                wall_clock_ms = report.wall_clock_millis,
                "Research workflow complete"
            );
            Ok::<_, WorkflowError>(report)
        }
        .instrument(span)
        .await
    }
}

fn notify_stage(progress: Option<&dyn ProgressSink>, stage: WorkflowStage) {
    if let Some(sink) = progress {
        sink.stage_changed(stage);
    }
}
