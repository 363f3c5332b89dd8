//! Init command implementation
//!
//! Scaffolds `marketlens.toml` and `.env.example` in a project directory.

use super::output::Output;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

/// Synthesis backend written into the scaffolded configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitProvider {
    /// Local Ollama server
    Ollama,
    /// OpenAI or a compatible endpoint
    Openai,
}

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (marketlens.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    pub provider: InitProvider,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing marketlens project");

    let base_path = &config.path;
    let config_path = base_path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    if let Err(e) = write_file(&config_path, &generate_config(config.provider), config.force) {
        output.error(&format!("Failed to create {}: {}", DEFAULT_CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", DEFAULT_CONFIG_FILE);

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("env", ".env.example");
    }

    output.complete("marketlens project initialized!");

    output.header("Next Steps");
    output.newline();
    match config.provider {
        InitProvider::Ollama => {
            output.info("1. Start Ollama and pull the synthesis model:");
            output.command("ollama serve");
            output.command("ollama pull llama3.2:3b");
        }
        InitProvider::Openai => {
            output.info("1. Set your API key:");
            output.command("cp .env.example .env");
            output.command("# Edit .env and set OPENAI_API_KEY");
        }
    }
    output.newline();
    output.info("2. Run a multi-market analysis:");
    output.command("marketlens run \"Contoso Ltd\" -r en-US -r de-DE -r ja-JP");

    output.hint("List market codes with: marketlens markets");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_config(provider: InitProvider) -> String {
    let synthesis_section = match provider {
        InitProvider::Ollama => {
            r#"# Local Ollama server
[synthesis]
type = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2:3b""#
        }
        InitProvider::Openai => {
            r#"# OpenAI-compatible API (set OPENAI_API_KEY in .env)
[synthesis]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
model = "gpt-4o-mini""#
        }
    };

    format!(
        r#"# marketlens configuration
# ========================

[logging]
# Default log filter; RUST_LOG overrides it
level = "info"
# "pretty" or "json"
format = "pretty"

[workflow]
# Seconds a single market search may take
region_timeout_secs = 90
# Seconds the whole search stage may take
overall_timeout_secs = 300
# Market searches running at the same time
max_concurrency = 10
# Markets searched when `run` gets no --region
default_regions = ["en-US", "en-GB", "de-DE", "fr-FR", "ja-JP"]

[search]
# "web" (DuckDuckGo, no key needed) or "rest"
provider = "web"
count = 10
# "day", "week" or "month"
freshness = "month"
# all, litigation, labor_practices, environmental, financial, regulatory, reputation
focus = "all"
# rest_url = "http://localhost:8080/search"
# api_key_env = "SEARCH_API_KEY"

{}
"#,
        synthesis_section
    )
}

fn generate_env_example() -> String {
    r#"# marketlens Environment Variables
# ================================
# Copy this file to .env and fill in the values.

# Optional: Logging filter (trace, debug, info, warn, error)
RUST_LOG=info,marketlens=debug

# Optional: OpenAI API key (if using the openai synthesis provider)
# OPENAI_API_KEY=sk-...

# Optional: REST search API key (if search.provider = "rest")
# SEARCH_API_KEY=your-key
"#
    .to_string()
}
