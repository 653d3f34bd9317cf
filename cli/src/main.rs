//! CLI entrypoint for chat-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use relay_application::{ChatController, RelayChatUseCase, RelayParams, RunExchangeUseCase};
use relay_infrastructure::{
    ConfigLoader, FileConfig, GeminiLlmGateway, GeminiSettings, HttpRelayTransport,
};
use relay_presentation::{AppState, ChatRepl, Cli, Command, serve};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --show-config
    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    for issue in config.validate() {
        warn!("Config {}: {}", issue.field, issue.message);
    }

    match cli.command.unwrap_or(Command::Chat { relay_url: None }) {
        Command::Serve { host, port } => run_server(config, host, port).await,
        Command::Chat { relay_url } => run_chat(config, relay_url).await,
    }
}

async fn run_server(mut config: FileConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting chat-relay server (model: {})", config.provider.model);

    // === Dependency Injection ===
    let gateway = Arc::new(GeminiLlmGateway::new(GeminiSettings::from(&config.provider)));
    let params = RelayParams::default()
        .with_model(config.provider.model.clone())
        .with_max_duration(config.provider.max_duration());
    let relay = RelayChatUseCase::new(gateway, params);

    let auth_token = config.server.resolve_auth_token();
    if auth_token.is_some() {
        info!("Bearer authentication enabled for /api/chat");
    }
    let state = AppState::new(relay).with_auth_token(auth_token);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    serve(listener, state, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn run_chat(mut config: FileConfig, relay_url: Option<String>) -> Result<()> {
    if let Some(url) = relay_url {
        config.client.relay_url = url;
    }

    let transport = Arc::new(HttpRelayTransport::from_config(&config.client));
    info!("Using relay at {}", transport.chat_url());

    let controller = ChatController::new(RunExchangeUseCase::new(transport));
    let mut repl = ChatRepl::new(controller, config.client.relay_url.clone());
    repl.run().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
