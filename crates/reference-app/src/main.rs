//! Reference OAuth 2.0 client and consent app for Ory Hydra
//!
//! Completes the authorization code flow as a confidential client and
//! serves the consent step for Hydra's admin consent API.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reference_app::{AppState, config::Config, router};

#[derive(Parser, Debug)]
#[command(name = "reference-app")]
#[command(about = "Reference OAuth 2.0 client and consent app for Ory Hydra")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "APP_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1", env = "APP_BIND")]
    bind: String,

    /// Path to config directory
    #[arg(long, default_value = "./config", env = "APP_CONFIG_PATH")]
    config_path: String,

    /// OAuth client ID (overrides config.json)
    #[arg(long, env = "OAUTH_CLIENT_ID")]
    client_id: Option<String>,

    /// OAuth client secret (overrides config.json)
    #[arg(long, env = "OAUTH_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reference_app=info,oauth_flow=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config_path)?.with_credentials(cli.client_id, cli.client_secret);

    if config.oauth.client_id().is_none() || config.oauth.client_secret().is_none() {
        tracing::warn!("Client credentials incomplete - callbacks will not exchange codes");
    }
    tracing::info!("Token endpoint: {}", config.oauth.token_endpoint);
    tracing::info!("Hydra admin API: {}", config.hydra.admin_url);

    let state = Arc::new(AppState::from_config(config, reqwest::Client::new()));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting reference-app on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Reference app shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
