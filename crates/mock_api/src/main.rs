use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use mock_api::{build_router, config::load_settings, seed, EventStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let store = if settings.seed {
        seed::store()
    } else {
        EventStore::default()
    };
    info!(events = store.event_count().await, "event store ready");

    let app = build_router(Arc::new(store), settings.max_body_bytes);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "mock events api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
