pub mod fichiers;
pub mod health;
pub mod recettes;

use axum::routing::get;
use axum::Router;

use crate::handlers::home;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /status                                   service status and contact
///
/// /recettes                                 list, create
/// /recettes/search                          filter (POST)
/// /recettes/populaires                      top rated
/// /recettes/recentes                        newest first
/// /recettes/en-attente|validees|rejetees    by moderation status
/// /recettes/categorie/{categorie}           by category
/// /recettes/utilisateur/{user_id}           by author
/// /recettes/{id}                            get, update, delete
/// /recettes/{id}/async                      get via offload pool
/// /recettes/{id}/exists                     existence check
/// /recettes/{id}/stats                      rating statistics
/// /recettes/{id}/valider                    approve (PUT)
/// /recettes/{id}/rejeter                    reject with reason (PUT)
///
/// /recettes/{id}/fichiers                   list, delete all
/// /recettes/{id}/fichiers/images            list, upload
/// /recettes/{id}/fichiers/documents         list, upload
/// /recettes/{id}/fichiers/{file_id}         metadata, delete
/// /recettes/{id}/fichiers/{file_id}/download
/// /recettes/{id}/fichiers/{file_id}/content
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(home::status))
        .nest("/recettes", recettes::router())
}
