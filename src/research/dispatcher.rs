//! Parallel Dispatcher/Executor
//!
//! Fans a request out into one [`RegionSearchTask`] per region, runs them on
//! the tokio runtime with at most `max_concurrency` in flight, and collects an
//! outcome for every region in request order.
//!
//! # Failure isolation
//!
//! Tasks never return errors, so one region failing has no effect on its
//! siblings. The only thing that stops the collection early is the overall
//! deadline: when it fires, every outstanding task is cancelled and receives a
//! synthesized `Timeout` outcome.

use crate::providers::SearchProvider;
use crate::research::coordinator::WorkflowOptions;
use crate::research::progress::ProgressSink;
use crate::research::task::{elapsed_millis, RegionSearchTask, OVERALL_TIMEOUT_MESSAGE};
use crate::types::{RegionOutcome, RegionQuery};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct Dispatcher {
    provider: Arc<dyn SearchProvider>,
    options: WorkflowOptions,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn SearchProvider>, options: WorkflowOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    /// Run one search task per region and return their outcomes in the order
    /// of `regions`, whatever order the tasks actually finish in.
    pub async fn dispatch(
        &self,
        subject: &str,
        regions: &[String],
        progress: Option<&dyn ProgressSink>,
    ) -> Vec<RegionOutcome> {
        let total = regions.len();
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        info!(
            regions = total,
            max_concurrency = self.options.max_concurrency,
            "Dispatching region searches"
        );

        for (index, region) in regions.iter().enumerate() {
            let task = RegionSearchTask::new(
                RegionQuery::new(subject, region.clone(), self.options.params.clone()),
                self.options.region_timeout,
                Arc::clone(&self.provider),
            );
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.child_token();

            tasks.spawn(async move {
                // Held until the task's outcome is produced
                let _permit = semaphore.acquire_owned().await;
                (index, task.run(cancel).await)
            });
        }

        let mut slots: Vec<Option<RegionOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;
        let mut deadline_hit = false;

        let deadline = tokio::time::sleep(self.options.overall_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((index, outcome))) => {
                        completed += 1;
                        debug!(
                            region = outcome.region(),
                            status = %outcome.status(),
                            completed,
                            total,
                            "Region search finished"
                        );
                        if let Some(sink) = progress {
                            sink.region_completed(outcome.region(), completed, total);
                        }
                        slots[index] = Some(outcome);
                    }
                    Some(Err(e)) => {
                        error!("Region task terminated abnormally: {}", e);
                    }
                },

                _ = &mut deadline => {
                    deadline_hit = true;
                    warn!(
                        timeout_secs = self.options.overall_timeout.as_secs_f64(),
                        completed,
                        total,
                        "Overall workflow timeout exceeded, cancelling outstanding regions"
                    );
                    cancel.cancel();
                    tasks.abort_all();
                    break;
                }
            }
        }

        let elapsed = elapsed_millis(started);
        let outcomes: Vec<RegionOutcome> = slots
            .into_iter()
            .zip(regions)
            .map(|(slot, region)| match slot {
                Some(outcome) => outcome,
                None if deadline_hit => RegionOutcome::timeout(region, OVERALL_TIMEOUT_MESSAGE, elapsed),
                None => RegionOutcome::error(region, "Region task terminated before producing a result", elapsed),
            })
            .collect();

        info!(
            completed,
            total,
            elapsed_ms = elapsed,
            truncated = deadline_hit,
            "Region dispatch finished"
        );

        outcomes
    }
}
