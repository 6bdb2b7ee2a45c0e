//! confbot-server: HTTP front end of the conference chatbot.
//!
//! Creates chat sessions, accepts user messages, and streams the model's
//! answers as Server-Sent Events while it consults the conference program
//! through tool calls.

mod app;
mod error;
mod protocol;
mod rate_limit;
mod reaper;
mod routes;


use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use confbot_ai::{OpenAiClient, OpenAiConfig, RunContext, SessionStore, ToolDispatcher};
use confbot_common::{ConfbotError, ConfigError};
use confbot_config::{load_config, validation, ConfbotConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::app::{build_router, AppState};
use crate::reaper::spawn_reaper;

#[derive(Parser)]
#[command(name = "confbot-server", about = "Conference chatbot HTTP server")]
struct Args {
    /// Config file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Conference program export (JSON).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `confbot_ai=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("confbot-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(args.log_level.as_deref(), &config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "confbot-server failed");
            ExitCode::FAILURE
        }
    }
}

/// Load the config file, then layer the command line on top and validate.
fn resolve_config(args: &Args) -> Result<ConfbotConfig, ConfigError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = u32::from(port);
    }
    if let Some(ref catalog) = args.catalog {
        config.catalog.path = catalog.clone();
    }
    validation::validate(&config)?;
    Ok(config)
}

/// `RUST_LOG` wins, then `--log-level`, then the config file.
fn init_tracing(cli_level: Option<&str>, config: &ConfbotConfig) {
    let fallback = cli_level
        .map(String::from)
        .unwrap_or_else(|| default_directive(config));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn default_directive(config: &ConfbotConfig) -> String {
    let level = config.logging.level.as_directive();
    ["confbot_server", "confbot_ai", "confbot_program", "confbot_config"]
        .map(|target| format!("{target}={level}"))
        .join(",")
}

async fn run(config: ConfbotConfig) -> Result<(), ConfbotError> {
    let catalog = confbot_program::read_catalog(&config.catalog.path)
        .map_err(|e| ConfbotError::Catalog(e.to_string()))?;
    tracing::info!(
        path = %config.catalog.path.display(),
        sessions = catalog.len(),
        "Conference program loaded"
    );

    let client_config = OpenAiConfig::from_settings(&config.completion)
        .map_err(|e| ConfbotError::Completion(e.to_string()))?;
    let client =
        OpenAiClient::new(client_config).map_err(|e| ConfbotError::Completion(e.to_string()))?;

    let dispatcher = ToolDispatcher::with_conference_tools(Arc::new(catalog));
    let run_context =
        RunContext::new(Arc::new(client), Arc::new(dispatcher)).with_settings(&config.sessions);
    let store = SessionStore::new(config.sessions.concurrent_run);

    if let Some(ttl) = config.sessions.idle_ttl() {
        let interval = std::time::Duration::from_secs(config.sessions.reap_interval_secs.into());
        spawn_reaper(store.clone(), ttl, interval);
        tracing::info!(?ttl, ?interval, "Idle session reaper started");
    }

    let state = AppState { store, run_context };
    let router = build_router(
        state,
        &config.rate_limit,
        config.server.allowed_origins.clone(),
    );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("confbot-server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| ConfbotError::Server(e.to_string()))
}
