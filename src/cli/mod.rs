//! CLI module for marketlens
//!
//! Provides command-line interface parsing for the marketlens binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use crate::research::WorkflowOptions;
use crate::types::{Freshness, RiskFocus};
use clap::{Args, Parser, Subcommand};
use init::InitProvider;
use std::path::PathBuf;
use std::time::Duration;

/// marketlens - multi-market company risk research
///
/// Searches several markets in parallel, each with its own timeout, and
/// synthesizes one cross-market risk analysis from whatever came back.
#[derive(Parser, Debug)]
#[command(
    name = "marketlens",
    version,
    about = "Multi-market company risk research",
    long_about = "Searches news and filings about a company in several markets in parallel,\n\
                  tolerates slow or failing markets, and produces one cross-market analysis\n\
                  with deduplicated sources.",
    after_help = "EXAMPLES:\n    \
                  marketlens init                                  # Scaffold marketlens.toml\n    \
                  marketlens run \"Contoso Ltd\"                     # Search the default markets\n    \
                  marketlens run \"Contoso Ltd\" -r en-US -r ja-JP   # Pick markets explicitly\n    \
                  marketlens run \"Contoso Ltd\" --json > report.json\n    \
                  marketlens markets                               # List market codes"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./marketlens.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a company across markets and print the cross-market analysis
    Run(RunArgs),

    /// List supported market codes
    Markets,

    /// Show the effective configuration
    Config {
        /// Only validate the configuration and report warnings
        #[arg(long)]
        validate: bool,
    },

    /// Initialize a marketlens.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Synthesis provider to configure
        #[arg(long, value_enum, default_value = "ollama")]
        provider: InitProvider,
    },
}

/// Arguments of `marketlens run`; unset flags fall back to the config file
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Company or subject to research
    pub subject: String,

    /// Market code to search (repeatable, order is kept)
    #[arg(short, long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Risk area to focus the searches on
    #[arg(long, value_parser = parse_focus)]
    pub focus: Option<RiskFocus>,

    /// Results requested per market
    #[arg(long)]
    pub count: Option<usize>,

    /// Recency window: day, week or month
    #[arg(long, value_parser = parse_freshness)]
    pub freshness: Option<Freshness>,

    /// Per-market timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub region_timeout: Option<u64>,

    /// Timeout for the whole search stage in seconds
    #[arg(long, value_name = "SECS")]
    pub overall_timeout: Option<u64>,

    /// Maximum market searches in flight
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

fn parse_focus(value: &str) -> Result<RiskFocus, String> {
    value.parse()
}

fn parse_freshness(value: &str) -> Result<Freshness, String> {
    value.parse()
}

impl RunArgs {
    /// Layer the flags that were given over options built from the config file
    pub fn apply_overrides(&self, mut options: WorkflowOptions) -> WorkflowOptions {
        if let Some(secs) = self.region_timeout {
            options.region_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.overall_timeout {
            options.overall_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_concurrency {
            options.max_concurrency = max;
        }
        if let Some(count) = self.count {
            options.params.count = count;
        }
        if let Some(freshness) = self.freshness {
            options.params.freshness = freshness;
        }
        if let Some(focus) = self.focus {
            options.params.focus = focus;
        }
        options
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "marketlens",
            "run",
            "Contoso Ltd",
            "-r",
            "en-US",
            "--region",
            "ja-JP",
            "--focus",
            "labor-practices",
            "--freshness",
            "week",
            "--region-timeout",
            "30",
            "--max-concurrency",
            "2",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.subject, "Contoso Ltd");
                assert_eq!(args.regions, vec!["en-US", "ja-JP"]);
                assert_eq!(args.focus, Some(RiskFocus::LaborPractices));
                assert_eq!(args.freshness, Some(Freshness::Week));
                assert_eq!(args.region_timeout, Some(30));
                assert_eq!(args.overall_timeout, None);
                assert_eq!(args.max_concurrency, Some(2));
                assert!(args.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let cli = Cli::try_parse_from([
            "marketlens",
            "run",
            "Contoso",
            "--overall-timeout",
            "60",
            "--count",
            "25",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };

        let base = WorkflowOptions::default().with_max_concurrency(3);
        let options = args.apply_overrides(base);

        assert_eq!(options.overall_timeout, Duration::from_secs(60));
        assert_eq!(options.region_timeout, Duration::from_secs(90));
        assert_eq!(options.max_concurrency, 3);
        assert_eq!(options.params.count, 25);
        assert_eq!(options.params.freshness, Freshness::Month);
    }

    #[test]
    fn test_invalid_focus_rejected() {
        let result = Cli::try_parse_from(["marketlens", "run", "Contoso", "--focus", "weather"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["marketlens", "markets", "--no-color", "-c", "alt.toml"]).unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Some(Commands::Markets)));
    }

    #[test]
    fn test_init_provider_value() {
        let cli = Cli::try_parse_from(["marketlens", "init", "demo", "--provider", "openai"]).unwrap();
        match cli.command {
            Some(Commands::Init {
                path,
                force,
                provider,
            }) => {
                assert_eq!(path, PathBuf::from("demo"));
                assert!(!force);
                assert_eq!(provider, InitProvider::Openai);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
