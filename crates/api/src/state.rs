use std::sync::Arc;

use recette_persistance::FileStore;

use crate::config::ServerConfig;
use crate::offload::OffloadPool;
use crate::services::RecipeService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached, validated recipe operations.
    pub recipes: Arc<RecipeService>,
    /// Attachment pass-through to MS-Persistance.
    pub files: Arc<dyn FileStore>,
    /// Bounded pool behind the async lookup endpoint.
    pub offload: Arc<OffloadPool>,
}
