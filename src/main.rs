use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use game_recs::{
    catalog::{load_catalog, JsonFileSource},
    config::Config,
    routes::{create_router, AppState},
    services::RecommendationService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("game_recs=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // A catalog that fails validation aborts startup
    let source = JsonFileSource::new(&config.catalog_path);
    let catalog = load_catalog(&source).await?;

    let service = RecommendationService::new(Arc::new(catalog), config.search_settings());
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
