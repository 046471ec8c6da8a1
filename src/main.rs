mod app;
mod handlers;
mod models;
mod services;
mod utils;

use anyhow::Context;
use app::config::Config;
use app::router::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().context("configuração inválida")?;
    info!("Starting PIX relay server on port {}", config.server_port);

    let state = AppState::from_config(&config);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
