//! Binary entrypoint: boots the Axum HTTP server, wiring routes, shared
//! state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use insureguard_analyzer::api::{self, AppState};
use insureguard_analyzer::config::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("insureguard_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::load_or_default();
    tracing::info!(mode = ?config.remote.mode, "loaded configuration");

    let state = AppState::new(config);
    let router = api::router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}
