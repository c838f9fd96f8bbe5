//! `rr-server` — serve shortest road routes over HTTP.
//!
//! Run with:
//!   cargo run -p rr-server -- --config rust_route.toml
//!
//! A `.env` file in the working directory may provide `GOOGLE_MAPS_API_KEY`.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rr_server::{RouteService, ServerConfig, router, telemetry};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the config file.
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve road data from a saved Overpass JSON file instead of the API.
    #[arg(long)]
    road_file: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.log);

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(file) = cli.road_file {
        config.road_data.file = Some(file);
    }
    config.apply_env();

    let service = Arc::new(RouteService::from_config(&config)?);
    let app = router(service);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
