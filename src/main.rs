//! QuestSearch - question search service and client
//!
//! Serves the filtered, sorted and paginated question search API and offers a
//! command line client that drives it through the query coordinator.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use questsearch_client::{
    CoordinatorOptions, HttpTransport, QueryCoordinator, QueryStatus, SearchParams,
};
use questsearch_core::{
    logging::{init_logger, LoggerConfig},
    LogFormat, QuestConfig, SearchPolicy, SortField, SortOrder,
};
use questsearch_serve::{AppState, ServerBuilder, ServerConfig};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "questsearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "QuestSearch - question search service and client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (json, pretty)
    #[arg(short, long, default_value = "pretty", global = true)]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the search API server
    Serve {
        /// Server host address
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Store URL (memory:// or postgres://...)
        #[arg(long)]
        database_url: Option<String>,

        /// JSON file used to seed the in-memory store
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Search questions through a running server
    Search {
        /// Search term
        query: String,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Results per page
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Sort field (title, type, createdAt, anagramType)
        #[arg(long, default_value = "createdAt")]
        sort: String,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "desc")]
        order: String,

        /// Question types to include, comma separated
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,

        /// API base URL (overrides configuration)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Write a default configuration file
    Init {
        /// Configuration file path
        #[arg(default_value = "questsearch.yaml")]
        path: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        path: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = QuestConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut logger = LoggerConfig::try_from(&config.logging)?;
    if cli.verbose {
        logger.level = "debug".to_string();
    }
    if cli.output == "json" {
        logger.format = LogFormat::Json;
    }
    init_logger(logger)?;

    match &cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
            seed,
        } => {
            let mut config = config.clone();
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(url) = database_url {
                config.database.url = url.clone();
            }
            if let Some(seed) = seed {
                config.database.seed_path = Some(seed.clone());
            }
            config.validate()?;
            handle_serve(config).await?;
        }

        Commands::Search {
            query,
            page,
            limit,
            sort,
            order,
            types,
            base_url,
        } => {
            let params = SearchParams::new(query.clone())
                .with_page(*page)
                .with_limit(*limit)
                .with_types(types.clone())
                .with_sort(parse_sort_field(sort)?, parse_sort_order(order)?);
            let base_url = base_url.clone().unwrap_or_else(|| config.client.base_url.clone());
            handle_search(&config, &base_url, params, &cli).await?;
        }

        Commands::Init { path } => {
            handle_init(path, &config)?;
        }

        Commands::Validate { path } => {
            handle_validate(path, &cli)?;
        }

        Commands::Version => {
            handle_version();
        }
    }

    Ok(())
}

fn parse_sort_field(raw: &str) -> anyhow::Result<SortField> {
    match SortField::from_name(raw) {
        Some(field) => Ok(field),
        None => bail!(
            "Unknown sort field '{}': expected title, type, createdAt or anagramType",
            raw
        ),
    }
}

fn parse_sort_order(raw: &str) -> anyhow::Result<SortOrder> {
    match raw {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => bail!("Unknown sort order '{}': expected asc or desc", other),
    }
}

async fn handle_serve(config: QuestConfig) -> anyhow::Result<()> {
    let store = questsearch_infra::open_store(&config.database)
        .await
        .context("Failed to open question store")?;
    let state = AppState::new(store, SearchPolicy::from(&config.search), config.environment);

    info!(
        "Starting QuestSearch v{} ({} environment)",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    ServerBuilder::from_config(ServerConfig::from(&config))
        .build(state)
        .start()
        .await?;
    Ok(())
}

async fn handle_search(
    config: &QuestConfig,
    base_url: &str,
    params: SearchParams,
    cli: &Cli,
) -> anyhow::Result<()> {
    let transport = HttpTransport::new(base_url, config.client.timeout())
        .with_context(|| format!("Invalid API base URL {}", base_url))?;
    let options = CoordinatorOptions {
        debounce: Duration::ZERO,
        ..CoordinatorOptions::from(&config.client)
    };
    let coordinator = QueryCoordinator::new(transport, options);

    let page = params.page;
    let state = coordinator.search_and_wait(params).await;

    if cli.output == "json" {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    match state.status {
        QueryStatus::Failed => {
            let message = state.error.unwrap_or_default();
            error!("Search failed: {}", message);
            bail!(message);
        }
        _ => {
            if state.questions.is_empty() {
                println!("No questions found");
            }
            for question in &state.questions {
                println!("[{}] {}", question.kind, question.title);
            }
            println!();
            println!(
                "Page {} of {} ({} results)",
                page, state.total_pages, state.total_items
            );
        }
    }

    Ok(())
}

fn handle_init(path: &Path, config: &QuestConfig) -> anyhow::Result<()> {
    if path.exists() {
        bail!("Configuration file {} already exists", path.display());
    }
    config.to_file(path)?;
    println!("Configuration initialized at {}", path.display());
    Ok(())
}

fn handle_validate(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let result = QuestConfig::from_file(path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match result {
        Ok(config) => {
            if cli.output == "json" {
                let mut shown = config.clone();
                shown.database.url = config.database.redacted_url();
                let report = serde_json::json!({ "valid": true, "config": shown });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Configuration is valid");
                println!("Environment: {}", config.environment);
                println!("Server: {}:{}", config.server.host, config.server.port);
                println!("Database: {}", config.database.redacted_url());
                println!("API base URL: {}", config.client.base_url);
            }
            Ok(())
        }
        Err(e) => {
            if cli.output == "json" {
                let report = serde_json::json!({ "valid": false, "error": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Configuration is invalid: {}", e);
            }
            bail!("invalid configuration {}", path.display())
        }
    }
}

fn handle_version() {
    println!("questsearch v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", questsearch_core::version_info());
    println!(
        "questsearch-serve v{}, questsearch-client v{}, questsearch-infra v{}",
        questsearch_serve::VERSION,
        questsearch_client::VERSION,
        questsearch_infra::VERSION
    );
}
