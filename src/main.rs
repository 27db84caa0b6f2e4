use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use studyhub_backend::core::config::Settings;
use studyhub_backend::core::logging;
use studyhub_backend::server;
use studyhub_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    logging::init(&settings);

    let state = AppState::initialize(settings.clone()).await;

    let bind_addr = format!("0.0.0.0:{}", settings.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
