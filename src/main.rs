//! askdb - Ask questions about a PostgreSQL database in plain English.

use std::sync::Arc;

use tracing::{error, info};

use askdb::cli::Cli;
use askdb::config::{Config, DatabaseConfig};
use askdb::db::{self, DatabaseClient, MockDatabaseClient};
use askdb::error::{AskdbError, Result};
use askdb::llm::{self, LlmService, MockLlmClient};
use askdb::logging;
use askdb::pipeline::Pipeline;
use askdb::viz::HeuristicVisualizer;

#[tokio::main]
async fn main() {
    // A .env file is honored for DATABASE_URL and OPENAI_API_KEY.
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Runs the pipeline once. Returns `Ok(false)` when the pipeline recorded
/// a stage failure (the failure has already been printed).
async fn run() -> Result<bool> {
    let cli = Cli::parse_args();
    let config = Config::load(cli.config.as_deref())?;

    let pipeline = build_pipeline(&cli, &config).await?;
    let state = pipeline.process(&cli.question).await;

    if cli.json {
        let rendered = serde_json::to_string_pretty(&state)
            .map_err(|e| AskdbError::internal(format!("Failed to serialize state: {e}")))?;
        println!("{rendered}");
        return Ok(!state.has_error());
    }

    if let Some(err) = &state.error {
        eprintln!("{err}");
        return Ok(false);
    }

    if cli.show_sql && !state.sql_query.is_empty() {
        println!("SQL: {}", state.sql_query);
        println!();
    }

    println!("{}", state.analysis);

    if let Some(chart) = &state.visualization {
        println!();
        println!("Suggested chart: {} ({})", chart.title, chart.kind.as_str());
    }

    Ok(true)
}

/// Wires the pipeline collaborators from CLI arguments and config.
async fn build_pipeline(cli: &Cli, config: &Config) -> Result<Pipeline> {
    let visualizer = Arc::new(HeuristicVisualizer::new());

    if cli.mock {
        info!("Using mock database and LLM");
        let service = Arc::new(LlmService::new(Box::new(MockLlmClient::new())));
        return Ok(Pipeline::new(
            Arc::new(MockDatabaseClient::new()),
            service.clone(),
            service.clone(),
            service,
            visualizer,
        ));
    }

    let db_config = resolve_database_config(cli, config)?;
    info!("Connecting to database");
    let db: Arc<dyn DatabaseClient> = Arc::from(db::connect(&db_config).await?);

    let client = llm::create_client(&config.llm)?;
    let service = Arc::new(LlmService::new(client));

    Ok(Pipeline::new(
        db,
        service.clone(),
        service.clone(),
        service,
        visualizer,
    ))
}

/// Resolves the database config with precedence:
/// 1. --database-url / DATABASE_URL (clap reads the env var)
/// 2. Config file
fn resolve_database_config(cli: &Cli, config: &Config) -> Result<DatabaseConfig> {
    if let Some(url) = &cli.database_url {
        return DatabaseConfig::from_url(url);
    }

    let mut db_config = config.database.clone();
    db_config.apply_env_defaults();
    db_config.connection_url()?;
    Ok(db_config)
}
