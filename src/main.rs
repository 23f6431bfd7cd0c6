//! The Game Loop - content site server

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gameloop::{
    api::{self, AppState},
    config::Config,
    content::{Connectivity, ContentClient, FallbackProvider, StrapiSource},
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gameloop=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting The Game Loop...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Content client
    let source = StrapiSource::new(&config.strapi)?;
    tracing::info!("Content API: {}", source.api_url());
    let client = ContentClient::new(source.boxed(), FallbackProvider::new())
        .with_empty_as_failure(config.strapi.empty_as_failure);

    let connectivity = if config.strapi.offline {
        tracing::info!("Offline mode, serving fallback content");
        Connectivity::Degraded
    } else {
        client.reconnect().await
    };

    // Initialize theme engine
    let theme_engine = ThemeEngine::new(&config.theme.path)?;
    tracing::info!("Theme engine initialized ({} overrides)", theme_engine.overridden().len());

    let cors_origin = config.server.cors_origin.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Build router
    let state = AppState::new(config, client, connectivity, theme_engine);
    let app = api::build_router(state, &cors_origin);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
