//! Handlers for `/api/recettes`.
//!
//! Responses are bare JSON (no envelope). Handlers only extract and shape
//! HTTP; validation, caching and discovery live in [`RecipeService`].
//!
//! [`RecipeService`]: crate::services::RecipeService

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use recette_core::recipe::{
    CreateRecipe, Recipe, RecipeStats, RecipeStatus, RejectionRequest, SearchCriteria,
    UpdateRecipe,
};
use recette_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::query::LimitParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/recettes
pub async fn create_recipe(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateRecipe>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let recipe = state.recipes.create(&input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recettes
pub async fn list_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.list_all().await?))
}

/// GET /api/recettes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(state.recipes.get(id).await?))
}

/// GET /api/recettes/{id}/async
///
/// Same lookup as [`get_recipe`], executed on the bounded offload pool.
/// Answers 503 when the pool is saturated.
pub async fn get_recipe_async(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Recipe>> {
    let recipes = Arc::clone(&state.recipes);
    let recipe = state
        .offload
        .submit(async move { recipes.get(id).await })
        .await??;
    Ok(Json(recipe))
}

/// PUT /api/recettes/{id}
///
/// Present fields replace the stored ones.
pub async fn update_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateRecipe>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(state.recipes.update(id, &input).await?))
}

/// DELETE /api/recettes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    state.recipes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recettes/{id}/exists
pub async fn recipe_exists(State(state): State<AppState>, ApiPath(id): ApiPath<DbId>) -> Json<bool> {
    Json(state.recipes.exists(id).await)
}

/// GET /api/recettes/{id}/stats
pub async fn recipe_stats(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<RecipeStats>> {
    Ok(Json(state.recipes.stats(id).await?))
}

// ---------------------------------------------------------------------------
// Listings and discovery
// ---------------------------------------------------------------------------

/// POST /api/recettes/search
pub async fn search_recipes(
    State(state): State<AppState>,
    ValidatedJson(criteria): ValidatedJson<SearchCriteria>,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.search(&criteria).await?))
}

/// GET /api/recettes/categorie/{categorie}
pub async fn recipes_by_category(
    State(state): State<AppState>,
    ApiPath(categorie): ApiPath<String>,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.list_by_category(&categorie).await?))
}

/// GET /api/recettes/utilisateur/{user_id}
pub async fn recipes_by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.list_by_user(user_id).await?))
}

/// GET /api/recettes/populaires?limit=
pub async fn popular_recipes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.popular(params.limit).await?))
}

/// GET /api/recettes/recentes?limit=
pub async fn recent_recipes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.recent(params.limit).await?))
}

/// GET /api/recettes/en-attente
pub async fn pending_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(state.recipes.list_by_status(RecipeStatus::Pending).await?))
}

/// GET /api/recettes/validees
pub async fn validated_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(
        state.recipes.list_by_status(RecipeStatus::Validated).await?,
    ))
}

/// GET /api/recettes/rejetees
pub async fn rejected_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(
        state.recipes.list_by_status(RecipeStatus::Rejected).await?,
    ))
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// PUT /api/recettes/{id}/valider
pub async fn validate_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(state.recipes.validate(id).await?))
}

/// PUT /api/recettes/{id}/rejeter
///
/// The body `{ "motif": "..." }` may be omitted entirely, in which case the
/// request fails the same way as a blank reason.
pub async fn reject_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Bytes,
) -> AppResult<Json<Recipe>> {
    let request = parse_rejection(&body)?;
    Ok(Json(
        state.recipes.reject(id, request.motif.as_deref()).await?,
    ))
}

fn parse_rejection(body: &[u8]) -> AppResult<RejectionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RejectionRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}
