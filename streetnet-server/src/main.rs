use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use streetnet_core::create_street_network;
use streetnet_server::{app, config::ServerConfig, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Street network accessibility queries over HTTP")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "streetnet.toml")]
    config: PathBuf,
    /// Address to listen on, overrides `bind` from the config
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let network_config = config.network.clone();
    let network =
        tokio::task::spawn_blocking(move || create_street_network(&network_config)).await??;
    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        "Street network loaded"
    );

    let router = app(AppState::new(network), &config);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on {}", config.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
