//! Region Search Task
//!
//! Runs one region's search against the [`SearchProvider`] and reduces every
//! possible ending into a [`RegionOutcome`]: a normal result, a provider
//! error, a panic inside the provider, the per-region timer firing, or the
//! workflow cancelling the task. Nothing is propagated to the caller.

use crate::providers::SearchProvider;
use crate::types::{RegionOutcome, RegionQuery};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};

/// Message attached to outcomes cut short by the workflow-level deadline
pub const OVERALL_TIMEOUT_MESSAGE: &str = "Overall workflow timeout exceeded";

/// One region's search, bounded by its own timeout
pub struct RegionSearchTask {
    query: RegionQuery,
    timeout: Duration,
    provider: Arc<dyn SearchProvider>,
}

impl RegionSearchTask {
    pub fn new(query: RegionQuery, timeout: Duration, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            query,
            timeout,
            provider,
        }
    }

    pub fn region(&self) -> &str {
        &self.query.region
    }

    /// Execute the search. Always yields an outcome.
    ///
    /// The provider call, the timeout timer and `cancel` are raced; whichever
    /// finishes first decides the outcome and the others are dropped.
    pub async fn run(self, cancel: CancellationToken) -> RegionOutcome {
        let span = info_span!(
            "region_search",
            region = %self.query.region,
            provider = self.provider.name()
        );

        async move {
            let started = Instant::now();
            let Self {
                query,
                timeout,
                provider,
            } = self;

            let search =
                AssertUnwindSafe(provider.search(&query.subject, &query.region, &query.params))
                    .catch_unwind();

            let outcome = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    RegionOutcome::timeout(&query.region, OVERALL_TIMEOUT_MESSAGE, elapsed_millis(started))
                }

                result = search => {
                    let elapsed = elapsed_millis(started);
                    match result {
                        Ok(Ok(response)) => {
                            RegionOutcome::success(&query.region, response.text, response.citations, elapsed)
                        }
                        Ok(Err(e)) => RegionOutcome::error(&query.region, e.to_string(), elapsed),
                        Err(panic) => RegionOutcome::error(
                            &query.region,
                            format!("Search provider panicked: {}", panic_message(panic.as_ref())),
                            elapsed,
                        ),
                    }
                }

                _ = tokio::time::sleep(timeout) => {
                    RegionOutcome::timeout(
                        &query.region,
                        format!("Search timed out after {}", format_duration(timeout)),
                        elapsed_millis(started),
                    )
                }
            };

            if outcome.is_success() {
                debug!(
                    citations = outcome.citations().len(),
                    elapsed_ms = outcome.elapsed_millis(),
                    "Region search succeeded"
                );
            } else {
                warn!(
                    status = %outcome.status(),
                    elapsed_ms = outcome.elapsed_millis(),
                    error = outcome.error_message().unwrap_or_default(),
                    "Region search failed"
                );
            }

            outcome
        }
        .instrument(span)
        .await
    }
}

pub(crate) fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// `90s`, `1500ms`
pub(crate) fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 && duration.as_secs() > 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SearchResponse;
    use crate::types::{Citation, ProviderError, QueryParams, RegionOutcomeStatus};
    use async_trait::async_trait;

    enum Behavior {
        Respond(Duration),
        Fail,
        Hang,
        Panic,
    }

    struct ScriptedProvider(Behavior);

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn search(
            &self,
            subject: &str,
            region: &str,
            _params: &QueryParams,
        ) -> Result<SearchResponse, ProviderError> {
            match self.0 {
                Behavior::Respond(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(SearchResponse {
                        text: format!("{} in {}", subject, region),
                        citations: vec![Citation::new(format!("https://{}.example", region), region)],
                    })
                }
                Behavior::Fail => Err(ProviderError::Request("connection reset".to_string())),
                Behavior::Hang => std::future::pending().await,
                Behavior::Panic => panic!("provider exploded"),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn task(behavior: Behavior, timeout: Duration) -> RegionSearchTask {
        RegionSearchTask::new(
            RegionQuery::new("Contoso", "en-US", QueryParams::default()),
            timeout,
            Arc::new(ScriptedProvider(behavior)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_copies_findings() {
        let outcome = task(Behavior::Respond(Duration::from_millis(200)), Duration::from_secs(90))
            .run(CancellationToken::new())
            .await;

        assert_eq!(outcome.status(), RegionOutcomeStatus::Success);
        assert_eq!(outcome.text(), "Contoso in en-US");
        assert_eq!(outcome.citations().len(), 1);
        assert_eq!(outcome.elapsed_millis(), 200);
        assert!(outcome.error_message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_error_becomes_error_outcome() {
        let outcome = task(Behavior::Fail, Duration::from_secs(90))
            .run(CancellationToken::new())
            .await;

        assert_eq!(outcome.status(), RegionOutcomeStatus::Error);
        assert!(outcome.error_message().unwrap().contains("connection reset"));
        assert!(outcome.text().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let outcome = task(Behavior::Hang, Duration::from_secs(90))
            .run(CancellationToken::new())
            .await;

        assert_eq!(outcome.status(), RegionOutcomeStatus::Timeout);
        assert_eq!(outcome.error_message(), Some("Search timed out after 90s"));
        assert_eq!(outcome.elapsed_millis(), 90_000);
        assert!(outcome.citations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_loses_race() {
        let outcome = task(Behavior::Respond(Duration::from_secs(5)), Duration::from_millis(1500))
            .run(CancellationToken::new())
            .await;

        assert_eq!(outcome.status(), RegionOutcomeStatus::Timeout);
        assert_eq!(outcome.error_message(), Some("Search timed out after 1500ms"));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let outcome = task(Behavior::Panic, Duration::from_secs(90))
            .run(CancellationToken::new())
            .await;

        assert_eq!(outcome.status(), RegionOutcomeStatus::Error);
        assert!(outcome.error_message().unwrap().contains("provider exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_yields_overall_timeout() {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(task(Behavior::Hang, Duration::from_secs(90)).run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let outcome = handle.await.unwrap();
        assert_eq!(outcome.status(), RegionOutcomeStatus::Timeout);
        assert_eq!(outcome.error_message(), Some(OVERALL_TIMEOUT_MESSAGE));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }
}
