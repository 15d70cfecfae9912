use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ballpark::{
    api,
    config::ServerConfig,
    facts::{SportsDbClient, SportsDbConfig},
    llm,
    roster::JsonRosterStore,
    state::{spawn_session_sweeper, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballpark=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ballpark...");

    let config = ServerConfig::from_env();

    let store = match JsonRosterStore::load(&config.roster_path).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(
                "Failed to load roster from {}: {}",
                config.roster_path.display(),
                e
            );
            return Err(e.into());
        }
    };

    let facts = Arc::new(SportsDbClient::new(&SportsDbConfig::from_env())?);

    let llm_config = llm::LlmConfig::from_env();
    let provider = match llm_config.build_provider() {
        Ok(provider) => {
            tracing::info!("LLM provider {} initialized", provider.name());
            Some(provider)
        }
        Err(e) => {
            tracing::warn!("{}. The umpire chat will not be available.", e);
            None
        }
    };

    let state = Arc::new(AppState::new_with_llm(store, facts, provider, llm_config));

    // Evict game sessions abandoned without a DELETE
    spawn_session_sweeper(state.clone(), config.session_ttl);

    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
