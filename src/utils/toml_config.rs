//! TOML-based configuration for marketlens
//!
//! Workflow timing, search backend and synthesis model are declared in a
//! TOML file (`marketlens.toml`). Every section and field is optional; a
//! missing default file simply means built-in defaults.

use crate::llm::Provider;
use crate::providers::{RestSearchProvider, SearchProvider, WebSearchProvider};
use crate::research::markets;
use crate::research::WorkflowOptions;
use crate::types::{Freshness, QueryParams, RiskFocus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "marketlens.toml";

/// Root configuration structure loaded from marketlens.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketlensConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Workflow Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_region_timeout")]
    pub region_timeout_secs: u64,

    #[serde(default = "default_overall_timeout")]
    pub overall_timeout_secs: u64,

    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Regions searched when `run` is given no `--region`
    #[serde(default = "default_regions")]
    pub default_regions: Vec<String>,
}

fn default_region_timeout() -> u64 {
    90
}

fn default_overall_timeout() -> u64 {
    300
}

fn default_max_concurrency() -> usize {
    10
}

fn default_regions() -> Vec<String> {
    vec![markets::DEFAULT_MARKET.to_string()]
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            region_timeout_secs: default_region_timeout(),
            overall_timeout_secs: default_overall_timeout(),
            max_concurrency: default_max_concurrency(),
            default_regions: default_regions(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// DuckDuckGo via daedra, no credentials needed
    #[default]
    Web,
    /// JSON search service at `rest_url`
    Rest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: SearchBackend,

    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(default)]
    pub freshness: Freshness,

    #[serde(default)]
    pub focus: RiskFocus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_url: Option<String>,

    /// Environment variable containing the REST search API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

fn default_count() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchBackend::default(),
            count: default_count(),
            freshness: Freshness::default(),
            focus: RiskFocus::default(),
            rest_url: None,
            api_key_env: None,
        }
    }
}

impl SearchConfig {
    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            count: self.count,
            freshness: self.freshness,
            focus: self.focus,
        }
    }
}

// ============= Synthesis Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SynthesisConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    /// The overall deadline cuts in before a single region could time out
    OverallShorterThanRegion,
    UnknownMarket,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl MarketlensConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MarketlensConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly named file, or fall back to `marketlens.toml` in the
    /// working directory and then to built-in defaults.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    let config = Self::default();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    /// Validate value ranges, backend requirements and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.region_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.region_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.workflow.overall_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.overall_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.workflow.max_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.workflow.default_regions.is_empty() {
            return Err(ConfigError::ValidationError(
                "workflow.default_regions must list at least one region".to_string(),
            ));
        }
        if self.search.count == 0 {
            return Err(ConfigError::ValidationError(
                "search.count must be at least 1".to_string(),
            ));
        }

        if self.search.provider == SearchBackend::Rest {
            match self.search.rest_url.as_deref() {
                Some(url) if !url.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::ValidationError(
                        "search.rest_url is required when search.provider = \"rest\"".to_string(),
                    ))
                }
            }
            if let Some(ref env) = self.search.api_key_env {
                self.validate_env_var(env)?;
            }
        }

        if let SynthesisConfig::OpenAI { api_key_env, .. } = &self.synthesis {
            self.validate_env_var(api_key_env)?;
        }

        Ok(())
    }

    /// Validate configuration and collect non-fatal warnings
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();

        if self.workflow.overall_timeout_secs < self.workflow.region_timeout_secs {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::OverallShorterThanRegion,
                message: format!(
                    "workflow.overall_timeout_secs ({}) is shorter than region_timeout_secs ({}); slow regions will be cut off by the overall deadline",
                    self.workflow.overall_timeout_secs, self.workflow.region_timeout_secs
                ),
            });
        }

        warnings.extend(
            markets::unsupported(&self.workflow.default_regions)
                .into_iter()
                .map(|code| ConfigWarning {
                    kind: ConfigWarningKind::UnknownMarket,
                    message: format!(
                        "Default region '{}' is not a known market code",
                        code
                    ),
                }),
        );

        Ok(warnings)
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Workflow options derived from the `[workflow]` and `[search]` sections
    pub fn workflow_options(&self) -> WorkflowOptions {
        WorkflowOptions::default()
            .with_region_timeout(Duration::from_secs(self.workflow.region_timeout_secs))
            .with_overall_timeout(Duration::from_secs(self.workflow.overall_timeout_secs))
            .with_max_concurrency(self.workflow.max_concurrency)
            .with_params(self.search.query_params())
    }

    /// Build the configured search backend
    pub fn search_provider(&self) -> Result<Arc<dyn SearchProvider>, ConfigError> {
        match self.search.provider {
            SearchBackend::Web => Ok(Arc::new(WebSearchProvider::new())),
            SearchBackend::Rest => {
                let url = self.search.rest_url.clone().ok_or_else(|| {
                    ConfigError::ValidationError(
                        "search.rest_url is required when search.provider = \"rest\"".to_string(),
                    )
                })?;
                let api_key = match &self.search.api_key_env {
                    Some(env) => Some(
                        self.resolve_env(env)
                            .ok_or_else(|| ConfigError::MissingEnvVar(env.clone()))?,
                    ),
                    None => None,
                };
                Ok(Arc::new(RestSearchProvider::new(url, api_key)))
            }
        }
    }

    /// Resolve the synthesis model into an LLM provider
    pub fn llm_provider(&self) -> Result<Provider, ConfigError> {
        match &self.synthesis {
            SynthesisConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
            SynthesisConfig::OpenAI {
                api_key_env,
                api_base,
                model,
            } => {
                let api_key = self
                    .resolve_env(api_key_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                })
            }
        }
    }

    /// Render the effective configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> String {
        r#"
[logging]
level = "debug"
format = "json"

[workflow]
region_timeout_secs = 45
overall_timeout_secs = 120
max_concurrency = 4
default_regions = ["en-US", "de-DE", "ja-JP"]

[search]
provider = "web"
count = 20
freshness = "week"
focus = "litigation"

[synthesis]
type = "ollama"
base_url = "http://gpu-box:11434"
model = "qwen3:8b"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = MarketlensConfig::from_toml_str(&create_test_config()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.workflow.region_timeout_secs, 45);
        assert_eq!(config.workflow.max_concurrency, 4);
        assert_eq!(config.workflow.default_regions.len(), 3);
        assert_eq!(config.search.freshness, Freshness::Week);
        assert_eq!(config.search.focus, RiskFocus::Litigation);
        assert_eq!(
            config.synthesis,
            SynthesisConfig::Ollama {
                base_url: "http://gpu-box:11434".to_string(),
                model: "qwen3:8b".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MarketlensConfig::from_toml_str("").unwrap();
        assert_eq!(config, MarketlensConfig::default());
        assert_eq!(config.workflow.region_timeout_secs, 90);
        assert_eq!(config.workflow.overall_timeout_secs, 300);
        assert_eq!(config.workflow.max_concurrency, 10);
        assert_eq!(config.workflow.default_regions, vec!["en-US"]);
        assert_eq!(config.search.provider, SearchBackend::Web);
        assert_eq!(config.search.count, 10);
    }

    #[test]
    fn test_workflow_options_from_config() {
        let config = MarketlensConfig::from_toml_str(&create_test_config()).unwrap();
        let options = config.workflow_options();

        assert_eq!(options.region_timeout, Duration::from_secs(45));
        assert_eq!(options.overall_timeout, Duration::from_secs(120));
        assert_eq!(options.max_concurrency, 4);
        assert_eq!(options.params.count, 20);
        assert_eq!(options.params.focus, RiskFocus::Litigation);
    }

    #[test]
    fn test_validation_zero_concurrency() {
        let result = MarketlensConfig::from_toml_str("[workflow]\nmax_concurrency = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = MarketlensConfig::from_toml_str("[workflow]\nregion_timeout_secs = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rest_requires_url() {
        let result = MarketlensConfig::from_toml_str("[search]\nprovider = \"rest\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_missing_env_var() {
        let content = r#"
[synthesis]
type = "openai"
api_key_env = "MARKETLENS_TEST_UNSET_KEY"
"#;
        let result = MarketlensConfig::from_toml_str(content);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref name)) if name == "MARKETLENS_TEST_UNSET_KEY")
        );
    }

    #[test]
    fn test_openai_provider_resolves_key() {
        std::env::set_var("MARKETLENS_TEST_OPENAI_KEY", "sk-test");
        let content = r#"
[synthesis]
type = "openai"
api_key_env = "MARKETLENS_TEST_OPENAI_KEY"
model = "gpt-4o"
"#;
        let config = MarketlensConfig::from_toml_str(content).unwrap();
        match config.llm_provider().unwrap() {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => {
                assert_eq!(api_key, "sk-test");
                assert_eq!(api_base, "https://api.openai.com/v1");
                assert_eq!(model, "gpt-4o");
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_rest_search_provider_built() {
        let content = r#"
[search]
provider = "rest"
rest_url = "http://localhost:8080/search"
"#;
        let config = MarketlensConfig::from_toml_str(content).unwrap();
        let provider = config.search_provider().unwrap();
        assert_eq!(provider.name(), "rest");
    }

    #[test]
    fn test_warnings() {
        let content = r#"
[workflow]
region_timeout_secs = 120
overall_timeout_secs = 60
default_regions = ["en-US", "xx-XX"]
"#;
        let config = MarketlensConfig::from_toml_str(content).unwrap();
        let warnings = config.validate_with_warnings().unwrap();

        let kinds: Vec<ConfigWarningKind> = warnings.iter().map(|w| w.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ConfigWarningKind::OverallShorterThanRegion,
                ConfigWarningKind::UnknownMarket
            ]
        );
        assert!(warnings[1].to_string().contains("xx-XX"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(create_test_config().as_bytes()).unwrap();

        let config = MarketlensConfig::load(file.path()).unwrap();
        assert_eq!(config.workflow.max_concurrency, 4);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let result = MarketlensConfig::load_or_default(Some(&missing));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = MarketlensConfig::from_toml_str("[workflow\nmax_concurrency = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = MarketlensConfig::from_toml_str(&create_test_config()).unwrap();
        let rendered = config.to_toml_string().unwrap();
        let reparsed = MarketlensConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(config, reparsed);
    }
}
