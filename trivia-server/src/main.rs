mod answers;
mod api;
mod clock;
mod config;
mod error;
mod questions;
mod state;

use config::Config;
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path =
        std::env::var("TRIVIA_SERVER_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load_or_default(&config_path)?;

    let state = Arc::new(AppState::from_config(&cfg).await?);
    let app = api::router(state.clone());

    let addr: SocketAddr = cfg.listen().parse()?;
    info!(%addr, "Starting trivia-server");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;

    state.answers.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
