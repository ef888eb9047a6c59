//! Guestbook server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use guestbook_core::config::AppConfig;
use guestbook_server::{AppState, create_router};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_PREFIX: &str = "GUESTBOOK_";
const CONFIG_ENV: &str = "GUESTBOOK_CONFIG";

/// Guestbook - name, message and photo submissions over HTTP
#[derive(Parser, Debug)]
#[command(name = "guestbookd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "GUESTBOOK_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from an optional TOML file overlaid with
/// `GUESTBOOK_`-prefixed environment variables (`__` separates sections).
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    let has_config_file = Path::new(path).exists();

    if has_config_file {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path);
    }

    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX) && key != CONFIG_ENV);

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: guestbookd --config /path/to/config.toml\n  \
             2. Environment variables: GUESTBOOK_AUTH__API_KEY=your-key guestbookd\n\n\
             See config/server.example.toml for example configuration.\n\
             Set GUESTBOOK_CONFIG env var to specify a default config file path."
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Guestbook v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    if config.server.metrics_enabled {
        guestbook_server::metrics::register_metrics();
        tracing::info!("Prometheus metrics registered");
    }

    let files = guestbook_storage::from_config(&config.storage)
        .await
        .context("failed to initialize photo storage")?;
    files
        .health_check()
        .await
        .context("photo storage health check failed")?;
    tracing::info!(backend = files.backend_name(), "Photo storage initialized");

    let records = guestbook_records::from_config(&config.records)
        .await
        .context("failed to initialize record store")?;
    tracing::info!("Record store initialized");

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    let state = AppState::new(config, files, records);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
