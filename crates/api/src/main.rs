//! Maestro API server binary.
//!
//! Usage:
//!   maestro-api --config config.toml
//!   maestro-api --port 8080
//!   maestro-api --port 8080 --bind 0.0.0.0
//!
//! # Environment Variables
//!
//! - `MAESTRO_BIND_ADDR` - Server bind address (default: 127.0.0.1)
//! - `RUST_LOG` - Log filter (default: info,maestro_api=debug,tower_http=debug)

use anyhow::Context;
use maestro_api::{serve, AppState};
use maestro_coordinator::CoordinatorConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    println!("Maestro API Server");
    println!();
    println!("Usage: maestro-api [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -p, --port <PORT>        Port to listen on (default: 8080)");
    println!("  -b, --bind <ADDR>        Bind address (default: 127.0.0.1, env: MAESTRO_BIND_ADDR)");
    println!("  -c, --config <FILE>      Path to config.toml file");
    println!("  -h, --help               Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,maestro_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut port: u16 = 8080;
    let mut config_path: Option<String> = None;
    let mut bind_addr: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let value = args.get(i + 1).context("--port requires a value")?;
                port = value
                    .parse()
                    .with_context(|| format!("Invalid port number: {}", value))?;
                i += 1;
            }
            "--config" | "-c" => {
                config_path = Some(args.get(i + 1).context("--config requires a value")?.clone());
                i += 1;
            }
            "--bind" | "-b" => {
                bind_addr = Some(args.get(i + 1).context("--bind requires a value")?.clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                tracing::warn!(argument = %other, "Ignoring unknown argument");
            }
        }
        i += 1;
    }

    // CLI flag > env var > default 127.0.0.1
    let host = bind_addr
        .or_else(|| std::env::var("MAESTRO_BIND_ADDR").ok())
        .unwrap_or_else(|| "127.0.0.1".to_string());

    if host == "0.0.0.0" {
        tracing::warn!(
            "Server binding to 0.0.0.0. The API has no authentication and is now reachable \
             from every network interface."
        );
    }

    let config = if let Some(path) = config_path {
        tracing::info!(path = %path, "Loading configuration");
        CoordinatorConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        CoordinatorConfig::default()
    };

    let state = AppState::new(config)?;

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    serve(Arc::new(state), addr).await?;

    Ok(())
}
