use std::net::SocketAddr;
use std::sync::Arc;

use recette_persistance::{FileStore, PersistanceClient, RecipeStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recette_api::cache::RecipeCache;
use recette_api::config::ServerConfig;
use recette_api::offload::OffloadPool;
use recette_api::router::build_app_router;
use recette_api::services::RecipeService;
use recette_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "recette_api=debug,recette_persistance=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- MS-Persistance client ---
    let client = Arc::new(
        PersistanceClient::new(
            config.persistance.base_url.clone(),
            config.persistance.connect_timeout,
            config.persistance.read_timeout,
        )
        .expect("Failed to build MS-Persistance HTTP client"),
    );
    tracing::info!(base_url = %client.base_url(), "MS-Persistance client configured");

    let recipe_store: Arc<dyn RecipeStore> = client.clone();
    let file_store: Arc<dyn FileStore> = client;

    // --- Services ---
    let cache = RecipeCache::new(&config.cache);
    let recipes = Arc::new(RecipeService::new(recipe_store, cache));
    let offload = Arc::new(OffloadPool::new(&config.offload));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        recipes,
        files: file_store,
        offload: Arc::clone(&offload),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting MS-Recette");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining async pool");
    offload.shutdown().await;
    tracing::info!("Shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
