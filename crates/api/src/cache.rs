//! Read cache in front of MS-Persistance.
//!
//! One `moka` region per query shape. Writes invalidate every region at once;
//! the keys a write affects are not tracked. Empty lists are never stored so a
//! transiently empty downstream answer is not served for the whole TTL.
//!
//! Every invalidation bumps a generation counter. A reader takes a
//! [`CacheTicket`] before going downstream and hands it back when storing the
//! result; a value fetched across an invalidation is discarded.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache;
use recette_core::recipe::{Recipe, RecipeStats, RecipeStatus};
use recette_core::types::DbId;

use crate::config::CacheConfig;

/// Invalidation generation observed before a downstream read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTicket(u64);

#[derive(Clone)]
pub struct RecipeCache {
    generation: Arc<AtomicU64>,
    all: Cache<(), Vec<Recipe>>,
    by_id: Cache<DbId, Recipe>,
    by_status: Cache<RecipeStatus, Vec<Recipe>>,
    by_category: Cache<String, Vec<Recipe>>,
    stats: Cache<DbId, RecipeStats>,
}

impl RecipeCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            all: region(config),
            by_id: region(config),
            by_status: region(config),
            by_category: region(config),
            stats: region(config),
        }
    }

    /// Take before calling downstream; pass to the matching `put_*`.
    pub fn ticket(&self) -> CacheTicket {
        CacheTicket(self.generation.load(Ordering::Acquire))
    }

    fn is_current(&self, ticket: CacheTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Insert unless an invalidation happened since `ticket` was taken.
    ///
    /// The generation is checked again after the insert: an invalidation that
    /// lands in between would otherwise leave the stale value behind.
    async fn store<K, V>(&self, region: &Cache<K, V>, ticket: CacheTicket, key: K, value: V)
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding value read across a cache invalidation");
            return;
        }
        region.insert(key.clone(), value).await;
        if !self.is_current(ticket) {
            region.invalidate(&key).await;
        }
    }

    pub async fn all(&self) -> Option<Vec<Recipe>> {
        self.all.get(&()).await
    }

    pub async fn put_all(&self, ticket: CacheTicket, recipes: &[Recipe]) {
        if !recipes.is_empty() {
            self.store(&self.all, ticket, (), recipes.to_vec()).await;
        }
    }

    pub async fn recipe(&self, id: DbId) -> Option<Recipe> {
        self.by_id.get(&id).await
    }

    pub async fn put_recipe(&self, ticket: CacheTicket, recipe: &Recipe) {
        self.store(&self.by_id, ticket, recipe.id, recipe.clone())
            .await;
    }

    pub async fn by_status(&self, status: RecipeStatus) -> Option<Vec<Recipe>> {
        self.by_status.get(&status).await
    }

    pub async fn put_by_status(&self, ticket: CacheTicket, status: RecipeStatus, recipes: &[Recipe]) {
        if !recipes.is_empty() {
            self.store(&self.by_status, ticket, status, recipes.to_vec())
                .await;
        }
    }

    pub async fn by_category(&self, categorie: &str) -> Option<Vec<Recipe>> {
        self.by_category.get(categorie).await
    }

    pub async fn put_by_category(&self, ticket: CacheTicket, categorie: &str, recipes: &[Recipe]) {
        if !recipes.is_empty() {
            self.store(
                &self.by_category,
                ticket,
                categorie.to_string(),
                recipes.to_vec(),
            )
            .await;
        }
    }

    pub async fn stats(&self, id: DbId) -> Option<RecipeStats> {
        self.stats.get(&id).await
    }

    pub async fn put_stats(&self, ticket: CacheTicket, id: DbId, stats: &RecipeStats) {
        self.store(&self.stats, ticket, id, stats.clone()).await;
    }

    /// Drop every cached entry in every region and retire outstanding tickets.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.all.invalidate_all();
        self.by_id.invalidate_all();
        self.by_status.invalidate_all();
        self.by_category.invalidate_all();
        self.stats.invalidate_all();
        tracing::debug!("Recipe caches invalidated");
    }
}

fn region<K, V>(config: &CacheConfig) -> Cache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(config.max_capacity)
        .time_to_live(config.time_to_live)
        .time_to_idle(config.time_to_idle)
        .build()
}
