//! Mock providers for workflow tests.
//!
//! These stand in for the search backend and the synthesis model so the
//! workflow can be driven deterministically under tokio's paused clock.

use async_trait::async_trait;
use marketlens::llm::LLMClient;
use marketlens::providers::{SearchProvider, SearchResponse, SynthesisProvider};
use marketlens::types::{Citation, ProviderError, QueryParams};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the scripted search provider does for one region
#[derive(Clone)]
pub enum RegionScript {
    /// Succeed after `delay` with the given citations as `(url, title)`
    Succeed {
        delay: Duration,
        citations: Vec<(String, String)>,
    },
    /// Report a provider error after `delay`
    Fail { delay: Duration, message: String },
    /// Never resolve
    Hang,
}

impl RegionScript {
    pub fn succeed_after(millis: u64, citations: &[(&str, &str)]) -> Self {
        RegionScript::Succeed {
            delay: Duration::from_millis(millis),
            citations: citations
                .iter()
                .map(|(url, title)| (url.to_string(), title.to_string()))
                .collect(),
        }
    }

    pub fn fail_after(millis: u64, message: &str) -> Self {
        RegionScript::Fail {
            delay: Duration::from_millis(millis),
            message: message.to_string(),
        }
    }
}

/// Decrements the in-flight counter and records drops of unfinished calls
struct CallGuard<'a> {
    provider: &'a ScriptedSearchProvider,
    finished: bool,
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.provider.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !self.finished {
            self.provider.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Search provider driven by a per-region script.
///
/// Regions without a script succeed immediately with one citation.
#[derive(Default)]
pub struct ScriptedSearchProvider {
    scripts: HashMap<String, RegionScript>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    abandoned: AtomicUsize,
}

impl ScriptedSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, region: &str, script: RegionScript) -> Self {
        self.scripts.insert(region.to_string(), script);
        self
    }

    /// Regions in the order their searches started
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Calls whose future was dropped before producing a result
    pub fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearchProvider {
    async fn search(
        &self,
        subject: &str,
        region: &str,
        _params: &QueryParams,
    ) -> Result<SearchResponse, ProviderError> {
        self.calls.lock().push(region.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let mut guard = CallGuard {
            provider: self,
            finished: false,
        };

        let script = self.scripts.get(region).cloned();
        let result = match script {
            None => Ok(SearchResponse {
                text: format!("{} coverage in {}", subject, region),
                citations: vec![Citation::new(
                    format!("https://{}.example/{}", region, subject),
                    region,
                )],
            }),
            Some(RegionScript::Succeed { delay, citations }) => {
                tokio::time::sleep(delay).await;
                Ok(SearchResponse {
                    text: format!("{} coverage in {}", subject, region),
                    citations: citations
                        .into_iter()
                        .map(|(url, title)| Citation::new(url, title))
                        .collect(),
                })
            }
            Some(RegionScript::Fail { delay, message }) => {
                tokio::time::sleep(delay).await;
                Err(ProviderError::Unavailable(message))
            }
            Some(RegionScript::Hang) => std::future::pending().await,
        };

        guard.finished = true;
        result
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Synthesis provider that records every context it receives
pub struct RecordingSynthesisProvider {
    reply: Result<String, ProviderError>,
    contexts: Mutex<Vec<String>>,
}

impl RecordingSynthesisProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.contexts.lock().len()
    }

    pub fn last_context(&self) -> Option<String> {
        self.contexts.lock().last().cloned()
    }
}

#[async_trait]
impl SynthesisProvider for RecordingSynthesisProvider {
    async fn synthesize(&self, _subject: &str, context: &str) -> Result<String, ProviderError> {
        self.contexts.lock().push(context.to_string());
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// LLM client returning a canned reply and keeping the prompts it saw
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLLMClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// `(system, prompt)` pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .push((system.to_string(), prompt.to_string()));
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
