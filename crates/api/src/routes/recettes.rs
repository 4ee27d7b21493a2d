//! Route definitions for recipes, mounted at `/recettes`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::recettes;
use crate::routes::fichiers;
use crate::state::AppState;

/// Recipe routes.
///
/// ```text
/// GET    /                          -> list_recipes
/// POST   /                          -> create_recipe
/// POST   /search                    -> search_recipes
/// GET    /populaires                -> popular_recipes
/// GET    /recentes                  -> recent_recipes
/// GET    /en-attente                -> pending_recipes
/// GET    /validees                  -> validated_recipes
/// GET    /rejetees                  -> rejected_recipes
/// GET    /categorie/{categorie}     -> recipes_by_category
/// GET    /utilisateur/{user_id}     -> recipes_by_user
/// GET    /{id}                      -> get_recipe
/// PUT    /{id}                      -> update_recipe
/// DELETE /{id}                      -> delete_recipe
/// GET    /{id}/async                -> get_recipe_async
/// GET    /{id}/exists               -> recipe_exists
/// GET    /{id}/stats                -> recipe_stats
/// PUT    /{id}/valider              -> validate_recipe
/// PUT    /{id}/rejeter              -> reject_recipe
/// *      /{id}/fichiers/...         -> see routes::fichiers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(recettes::list_recipes).post(recettes::create_recipe),
        )
        .route("/search", post(recettes::search_recipes))
        .route("/populaires", get(recettes::popular_recipes))
        .route("/recentes", get(recettes::recent_recipes))
        .route("/en-attente", get(recettes::pending_recipes))
        .route("/validees", get(recettes::validated_recipes))
        .route("/rejetees", get(recettes::rejected_recipes))
        .route("/categorie/{categorie}", get(recettes::recipes_by_category))
        .route("/utilisateur/{user_id}", get(recettes::recipes_by_user))
        .route(
            "/{id}",
            get(recettes::get_recipe)
                .put(recettes::update_recipe)
                .delete(recettes::delete_recipe),
        )
        .route("/{id}/async", get(recettes::get_recipe_async))
        .route("/{id}/exists", get(recettes::recipe_exists))
        .route("/{id}/stats", get(recettes::recipe_stats))
        .route("/{id}/valider", put(recettes::validate_recipe))
        .route("/{id}/rejeter", put(recettes::reject_recipe))
        .nest("/{id}/fichiers", fichiers::router())
}
