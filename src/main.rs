use std::sync::Arc;

use anyhow::Context;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use bookworm_api::{
    config::Config,
    middleware::make_span,
    routes::{create_router, AppState},
    stores::{create_pool, PgCatalogStore, PgLibraryStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookworm_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let state = AppState::new(
        Arc::new(PgLibraryStore::new(pool.clone())),
        Arc::new(PgCatalogStore::new(pool)),
    );

    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, "Bookworm API listening");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
