use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============= Query Types =============

/// Recency window applied to a region search
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Day,
    Week,
    #[default]
    Month,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Day => "day",
            Freshness::Week => "week",
            Freshness::Month => "month",
        }
    }
}

impl std::str::FromStr for Freshness {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Freshness::Day),
            "week" => Ok(Freshness::Week),
            "month" => Ok(Freshness::Month),
            other => Err(format!("unknown freshness '{}' (expected day, week or month)", other)),
        }
    }
}

/// Risk area a search concentrates on
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskFocus {
    #[default]
    All,
    Litigation,
    LaborPractices,
    Environmental,
    Financial,
    Regulatory,
    Reputation,
}

impl RiskFocus {
    pub const ALL: [RiskFocus; 7] = [
        RiskFocus::All,
        RiskFocus::Litigation,
        RiskFocus::LaborPractices,
        RiskFocus::Environmental,
        RiskFocus::Financial,
        RiskFocus::Regulatory,
        RiskFocus::Reputation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFocus::All => "all",
            RiskFocus::Litigation => "litigation",
            RiskFocus::LaborPractices => "labor_practices",
            RiskFocus::Environmental => "environmental",
            RiskFocus::Financial => "financial",
            RiskFocus::Regulatory => "regulatory",
            RiskFocus::Reputation => "reputation",
        }
    }

    /// Search phrase used for this focus
    pub fn search_phrase(&self, subject: &str) -> String {
        match self {
            RiskFocus::All => format!("{} risks controversies legal issues", subject),
            RiskFocus::Litigation => format!("{} lawsuits legal cases court filings", subject),
            RiskFocus::LaborPractices => {
                format!("{} labor violations employee complaints child labor", subject)
            }
            RiskFocus::Environmental => {
                format!("{} environmental violations pollution ESG", subject)
            }
            RiskFocus::Financial => format!("{} financial risks debt bankruptcy", subject),
            RiskFocus::Regulatory => {
                format!("{} regulatory violations fines investigations", subject)
            }
            RiskFocus::Reputation => format!("{} scandals controversies", subject),
        }
    }
}

impl std::str::FromStr for RiskFocus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        RiskFocus::ALL
            .iter()
            .copied()
            .find(|focus| focus.as_str() == normalized)
            .ok_or_else(|| format!("unknown risk focus '{}'", s))
    }
}

/// Pass-through parameters handed to the search provider for every region
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Number of results requested per region
    pub count: usize,
    pub freshness: Freshness,
    #[serde(default)]
    pub focus: RiskFocus,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            count: 10,
            freshness: Freshness::default(),
            focus: RiskFocus::default(),
        }
    }
}

/// Input to one region task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionQuery {
    pub subject: String,
    pub region: String,
    pub params: QueryParams,
}

impl RegionQuery {
    pub fn new(subject: impl Into<String>, region: impl Into<String>, params: QueryParams) -> Self {
        Self {
            subject: subject.into(),
            region: region.into(),
            params,
        }
    }
}

// ============= Outcome Types =============

/// Source citation returned by a search provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Citation {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<usize>,
}

impl Citation {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            start_offset: None,
            end_offset: None,
        }
    }

    pub fn with_offsets(mut self, start: Option<usize>, end: Option<usize>) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }
}

/// Terminal classification of one region task
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegionOutcomeStatus {
    Success,
    Timeout,
    Error,
}

impl RegionOutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionOutcomeStatus::Success => "success",
            RegionOutcomeStatus::Timeout => "timeout",
            RegionOutcomeStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RegionOutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of attempting one region's search.
///
/// Built only through [`RegionOutcome::success`], [`RegionOutcome::timeout`] and
/// [`RegionOutcome::error`], so a failed outcome never carries text or citations
/// and a successful one never carries an error message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(try_from = "RegionOutcomeRecord")]
pub struct RegionOutcome {
    region: String,
    status: RegionOutcomeStatus,
    text: String,
    citations: Vec<Citation>,
    elapsed_millis: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

/// Wire form of [`RegionOutcome`], checked before it becomes one
#[derive(Deserialize)]
struct RegionOutcomeRecord {
    region: String,
    status: RegionOutcomeStatus,
    #[serde(default)]
    text: String,
    #[serde(default)]
    citations: Vec<Citation>,
    elapsed_millis: u64,
    #[serde(default)]
    error_message: Option<String>,
}

impl TryFrom<RegionOutcomeRecord> for RegionOutcome {
    type Error = String;

    fn try_from(record: RegionOutcomeRecord) -> std::result::Result<Self, Self::Error> {
        match record.status {
            RegionOutcomeStatus::Success => {
                if record.error_message.is_some() {
                    return Err(format!(
                        "successful outcome for '{}' carries an error message",
                        record.region
                    ));
                }
                Ok(Self::success(
                    record.region,
                    record.text,
                    record.citations,
                    record.elapsed_millis,
                ))
            }
            status => {
                if !record.text.is_empty() || !record.citations.is_empty() {
                    return Err(format!(
                        "{} outcome for '{}' carries findings",
                        status, record.region
                    ));
                }
                Ok(Self {
                    region: record.region,
                    status,
                    text: String::new(),
                    citations: Vec::new(),
                    elapsed_millis: record.elapsed_millis,
                    error_message: record.error_message,
                })
            }
        }
    }
}

impl RegionOutcome {
    pub fn success(
        region: impl Into<String>,
        text: impl Into<String>,
        citations: Vec<Citation>,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            region: region.into(),
            status: RegionOutcomeStatus::Success,
            text: text.into(),
            citations,
            elapsed_millis,
            error_message: None,
        }
    }

    pub fn timeout(region: impl Into<String>, message: impl Into<String>, elapsed_millis: u64) -> Self {
        Self::failed(region, RegionOutcomeStatus::Timeout, message, elapsed_millis)
    }

    pub fn error(region: impl Into<String>, message: impl Into<String>, elapsed_millis: u64) -> Self {
        Self::failed(region, RegionOutcomeStatus::Error, message, elapsed_millis)
    }

    fn failed(
        region: impl Into<String>,
        status: RegionOutcomeStatus,
        message: impl Into<String>,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            region: region.into(),
            status,
            text: String::new(),
            citations: Vec::new(),
            elapsed_millis,
            error_message: Some(message.into()),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn status(&self) -> RegionOutcomeStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == RegionOutcomeStatus::Success
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Reduction of the complete outcome list, in request order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AggregatedResult {
    pub successful_regions: Vec<String>,
    pub failed_regions: Vec<String>,
    pub all_outcomes: Vec<RegionOutcome>,
    /// Citations of successful regions, unique by URL, first occurrence kept
    pub deduped_citations: Vec<Citation>,
    /// Sum of per-region elapsed time (cumulative work, not wall-clock)
    pub total_elapsed_millis: u64,
}

// ============= Report Types =============

/// One line of the per-region summary table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub region: String,
    pub status: RegionOutcomeStatus,
    pub elapsed_millis: u64,
    pub citation_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&RegionOutcome> for RegionSummary {
    fn from(outcome: &RegionOutcome) -> Self {
        Self {
            region: outcome.region().to_string(),
            status: outcome.status(),
            elapsed_millis: outcome.elapsed_millis(),
            citation_count: outcome.citations().len(),
            error_message: outcome.error_message().map(str::to_string),
        }
    }
}

/// Final artifact of a workflow run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkflowReport {
    pub run_id: Uuid,
    pub subject: String,
    pub narrative_text: String,
    pub citations: Vec<Citation>,
    pub successful_regions: Vec<String>,
    pub failed_regions: Vec<String>,
    pub total_elapsed_millis: u64,
    /// Dispatch start to synthesis end
    pub wall_clock_millis: u64,
    pub per_region_summary: Vec<RegionSummary>,
    pub generated_at: DateTime<Utc>,
}

// ============= Error Types =============

/// Failure reported by an external search or synthesis capability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Fatal outcome of a workflow run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid workflow request: {0}")]
    InvalidRequest(String),

    #[error("Cross-region synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::utils::toml_config::ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
