//! Recipe operations: validation, caching and in-process discovery on top
//! of a [`RecipeStore`].

use std::sync::Arc;

use recette_core::error::CoreError;
use recette_core::recipe::{
    CreateRecipe, Recipe, RecipeStats, RecipeStatus, SearchCriteria, UpdateRecipe,
};
use recette_core::search::{self, DEFAULT_LIMIT, MAX_LIMIT};
use recette_core::types::DbId;
use recette_core::validation;
use recette_persistance::{PersistanceError, RecipeStore};

use crate::cache::RecipeCache;
use crate::error::{not_found_as, AppError, AppResult};

pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    cache: RecipeCache,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>, cache: RecipeCache) -> Self {
        Self { store, cache }
    }

    // ---------------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------------

    pub async fn create(&self, request: &CreateRecipe) -> AppResult<Recipe> {
        validation::validate_create(request)?;

        let recipe = self.store.create(request).await?;
        self.cache.invalidate_all();

        tracing::info!(recipe_id = recipe.id, "Recipe created");
        Ok(recipe)
    }

    pub async fn update(&self, id: DbId, request: &UpdateRecipe) -> AppResult<Recipe> {
        validation::validate_update(request)?;

        let recipe = self
            .store
            .update(id, request)
            .await
            .map_err(missing_recipe(id))?;
        self.cache.invalidate_all();

        tracing::info!(recipe_id = id, "Recipe updated");
        Ok(recipe)
    }

    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        self.store.delete(id).await.map_err(missing_recipe(id))?;
        self.cache.invalidate_all();

        tracing::info!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    pub async fn validate(&self, id: DbId) -> AppResult<Recipe> {
        let recipe = self.store.validate(id).await.map_err(missing_recipe(id))?;
        self.cache.invalidate_all();

        tracing::info!(recipe_id = id, "Recipe validated");
        Ok(recipe)
    }

    pub async fn reject(&self, id: DbId, motif: Option<&str>) -> AppResult<Recipe> {
        let motif = validation::validate_rejection_reason(motif)?;

        let recipe = self
            .store
            .reject(id, motif)
            .await
            .map_err(missing_recipe(id))?;
        self.cache.invalidate_all();

        tracing::info!(recipe_id = id, motif, "Recipe rejected");
        Ok(recipe)
    }

    // ---------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------

    pub async fn get(&self, id: DbId) -> AppResult<Recipe> {
        if let Some(recipe) = self.cache.recipe(id).await {
            return Ok(recipe);
        }

        let ticket = self.cache.ticket();
        let recipe = self.store.get(id).await.map_err(missing_recipe(id))?;
        self.cache.put_recipe(ticket, &recipe).await;
        Ok(recipe)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Recipe>> {
        if let Some(recipes) = self.cache.all().await {
            return Ok(recipes);
        }

        let ticket = self.cache.ticket();
        let recipes = self.store.list_all().await?;
        tracing::debug!(count = recipes.len(), "Fetched all recipes");
        self.cache.put_all(ticket, &recipes).await;
        Ok(recipes)
    }

    pub async fn list_by_category(&self, categorie: &str) -> AppResult<Vec<Recipe>> {
        if let Some(recipes) = self.cache.by_category(categorie).await {
            return Ok(recipes);
        }

        let ticket = self.cache.ticket();
        let recipes = self.store.list_by_category(categorie).await?;
        tracing::debug!(categorie, count = recipes.len(), "Fetched recipes by category");
        self.cache.put_by_category(ticket, categorie, &recipes).await;
        Ok(recipes)
    }

    pub async fn list_by_status(&self, status: RecipeStatus) -> AppResult<Vec<Recipe>> {
        if let Some(recipes) = self.cache.by_status(status).await {
            return Ok(recipes);
        }

        let ticket = self.cache.ticket();
        let recipes = self.store.list_by_status(status).await?;
        tracing::debug!(%status, count = recipes.len(), "Fetched recipes by status");
        self.cache.put_by_status(ticket, status, &recipes).await;
        Ok(recipes)
    }

    pub async fn list_by_user(&self, user_id: DbId) -> AppResult<Vec<Recipe>> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    pub async fn stats(&self, id: DbId) -> AppResult<RecipeStats> {
        if let Some(stats) = self.cache.stats(id).await {
            return Ok(stats);
        }

        let ticket = self.cache.ticket();
        let stats = self.store.stats(id).await.map_err(missing_recipe(id))?;
        self.cache.put_stats(ticket, id, &stats).await;
        Ok(stats)
    }

    /// `false` both when the recipe is absent and when the lookup failed.
    pub async fn exists(&self, id: DbId) -> bool {
        match self.store.exists(id).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(recipe_id = id, error = %err, "Existence check failed");
                false
            }
        }
    }

    // ---------------------------------------------------------------------------
    // Discovery
    // ---------------------------------------------------------------------------

    pub async fn search(&self, criteria: &SearchCriteria) -> AppResult<Vec<Recipe>> {
        let recipes = search::filter_recipes(self.list_all().await?, criteria);
        tracing::info!(count = recipes.len(), "Recipe search completed");
        Ok(recipes)
    }

    pub async fn popular(&self, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        let limit = search::clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT) as usize;
        Ok(search::rank_popular(self.list_all().await?, limit))
    }

    pub async fn recent(&self, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        let limit = search::clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT) as usize;
        Ok(search::rank_recent(self.list_all().await?, limit))
    }
}

fn missing_recipe(id: DbId) -> impl FnOnce(PersistanceError) -> AppError {
    not_found_as(CoreError::recipe_not_found(id))
}
