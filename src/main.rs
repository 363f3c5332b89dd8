use anyhow::Context;
use marketlens::{
    cli::{
        init::{self, InitConfig, InitResult},
        output::{Output, ProgressPrinter},
        Cli, Commands, RunArgs,
    },
    providers::LlmSynthesisProvider,
    research::{markets, ResearchCoordinator},
    utils::toml_config::{LogFormat, LoggingConfig, MarketlensConfig, DEFAULT_CONFIG_FILE},
};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let needs_config = matches!(
        cli.command,
        Some(Commands::Run(_)) | Some(Commands::Config { .. })
    );
    let config = if needs_config {
        let config = MarketlensConfig::load_or_default(cli.config.as_deref())
            .context("failed to load configuration")?;
        Some(config)
    } else {
        None
    };

    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging, cli.verbose);

    if needs_config && cli.config.is_none() && !Path::new(DEFAULT_CONFIG_FILE).exists() {
        tracing::warn!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
    }

    match (cli.command, config) {
        (Some(Commands::Run(args)), Some(config)) => {
            run_research(args, &config, &output, !cli.no_color).await
        }
        (Some(Commands::Config { validate }), Some(config)) => show_config(&config, validate, &output),
        (Some(Commands::Markets), _) => {
            output.markets(&markets::SUPPORTED_MARKETS);
            Ok(())
        }
        (
            Some(Commands::Init {
                path,
                force,
                provider,
            }),
            _,
        ) => match init::run(
            InitConfig {
                path,
                force,
                provider,
            },
            &output,
        ) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => Err(anyhow::anyhow!("init failed: {}", e)),
        },
        (None, _) => {
            output.banner();
            output.hint("Run `marketlens --help` to see available commands");
            Ok(())
        }
        (Some(_), None) => Err(anyhow::anyhow!("configuration was not loaded")),
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

async fn run_research(
    args: RunArgs,
    config: &MarketlensConfig,
    output: &Output,
    colored: bool,
) -> anyhow::Result<()> {
    let regions = if args.regions.is_empty() {
        config.workflow.default_regions.clone()
    } else {
        args.regions.clone()
    };

    for code in markets::unsupported(&regions) {
        output.warning(&format!(
            "'{}' is not a known market code, searching it anyway",
            code
        ));
    }

    let options = args.apply_overrides(config.workflow_options());
    let search = config
        .search_provider()
        .context("failed to set up search provider")?;
    let llm = config
        .llm_provider()
        .context("failed to resolve synthesis provider")?
        .create_client()
        .context("failed to create LLM client")?;
    let coordinator = ResearchCoordinator::new(search, Arc::new(LlmSynthesisProvider::new(llm)));

    if !args.json {
        output.banner();
        output.info(&format!(
            "Researching '{}' in {} market(s): {}",
            args.subject,
            regions.len(),
            regions.join(", ")
        ));
    }

    let progress = ProgressPrinter::new(colored);
    let report = coordinator
        .run_workflow(&args.subject, &regions, options, Some(&progress))
        .await
        .context("research workflow failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output.report(&report);
    }

    Ok(())
}

fn show_config(config: &MarketlensConfig, validate_only: bool, output: &Output) -> anyhow::Result<()> {
    let warnings = config.validate_with_warnings()?;

    if validate_only {
        output.success("Configuration is valid");
    } else {
        output.header("Effective configuration");
        println!();
        println!("{}", config.to_toml_string()?);
    }

    for warning in &warnings {
        output.warning(&warning.to_string());
    }

    Ok(())
}
