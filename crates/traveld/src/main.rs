//! traveld - Travel Gateway Daemon
//!
//! Aggregates route searches across the train, bus and flight provider
//! services behind one authenticated REST API.
//!
//! Usage:
//!   traveld [OPTIONS] [config.toml]
//!
//! If no config file is provided, the providers are expected on their
//! conventional local ports.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use travel_api::{create_router, AppState};
use travel_client::ServiceClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{GatewayConfig, LogFormat, DEFAULT_JWT_SECRET};

/// Parsed command-line arguments
struct Args {
    /// Gateway config file (TOML)
    config_path: Option<String>,
    /// Overrides `server.port`
    port: Option<u16>,
    /// Overrides `server.log_format`
    log_json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        config_path: None,
        port: None,
        log_json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    result.port = Some(args[i + 1].parse()?);
                    i += 2;
                } else {
                    anyhow::bail!("Missing argument for --port");
                }
            }
            "--log-json" => {
                result.log_json = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
                i += 1;
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
    }

    Ok(result)
}

fn print_help() {
    eprintln!(
        r#"traveld - Travel Gateway Daemon

Usage: traveld [OPTIONS] [config.toml]

Options:
  -p, --port <port>  Listen port (overrides server.port)
      --log-json     Emit logs as JSON (overrides server.log_format)
  -h, --help         Print this help message

Examples:
  # Providers on their default local ports
  traveld

  # Run with config file
  traveld gateway.toml

  # Override the port
  traveld --port 8088 gateway.toml
"#
    );
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "traveld=info,travel_api=info,travel_gateway=info,travel_client=info,tower_http=info"
            .into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    let config = match args.config_path.as_deref() {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::default(),
    };

    let log_format = if args.log_json {
        LogFormat::Json
    } else {
        config.server.log_format
    };
    init_logging(log_format);

    tracing::info!("Starting traveld (Travel Gateway Daemon)");
    match args.config_path.as_deref() {
        Some(path) => tracing::info!("Loaded config from: {}", path),
        None => tracing::info!("No config file provided, using default provider addresses"),
    }

    let registry = Arc::new(config.registry()?);
    for backend in registry.iter() {
        tracing::info!(
            service = %backend.kind,
            url = %backend.base_url,
            "Registered backend"
        );
    }

    let client = ServiceClient::with_connect_timeout(config.connect_timeout())?;
    let state = AppState::new(registry, Arc::new(client), config.call_timeout());

    match &config.auth.token {
        Some(_) => tracing::info!("Accepting the configured static bearer token"),
        None if config.auth.jwt_secret == DEFAULT_JWT_SECRET => {
            tracing::warn!("auth.jwt_secret not set, verifying tokens with the built-in key")
        }
        None => tracing::info!(
            issuer = %config.auth.issuer,
            audience = %config.auth.audience,
            "Verifying bearer tokens as HS256 JWTs"
        ),
    }

    let app = create_router(state, config.auth.policy());

    let port = args.port.unwrap_or(config.server.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(
        timeout_ms = config.gateway.timeout_ms,
        "Listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
