//! Storage seams the gateway depends on.
//!
//! Handlers and services hold `Arc<dyn RecipeStore>` / `Arc<dyn FileStore>`,
//! so tests can swap the HTTP client for an in-memory implementation.

use async_trait::async_trait;
use recette_core::file::{FileKind, RecipeFile};
use recette_core::recipe::{
    CreateRecipe, Recipe, RecipeStats, RecipeStatus, SearchCriteria, UpdateRecipe,
};
use recette_core::types::DbId;

use crate::error::PersistanceError;

/// Recipe operations offered by the persistence service.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn create(&self, request: &CreateRecipe) -> Result<Recipe, PersistanceError>;

    async fn list_all(&self) -> Result<Vec<Recipe>, PersistanceError>;

    async fn get(&self, id: DbId) -> Result<Recipe, PersistanceError>;

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, PersistanceError>;

    /// Category listings are served by the search endpoint.
    async fn list_by_category(&self, categorie: &str) -> Result<Vec<Recipe>, PersistanceError> {
        self.search(&SearchCriteria::for_category(categorie)).await
    }

    async fn list_by_status(&self, status: RecipeStatus) -> Result<Vec<Recipe>, PersistanceError>;

    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Recipe>, PersistanceError>;

    async fn update(&self, id: DbId, request: &UpdateRecipe) -> Result<Recipe, PersistanceError>;

    async fn delete(&self, id: DbId) -> Result<(), PersistanceError>;

    async fn validate(&self, id: DbId) -> Result<Recipe, PersistanceError>;

    async fn reject(&self, id: DbId, motif: &str) -> Result<Recipe, PersistanceError>;

    /// `Ok(true)` on 2xx, `Ok(false)` on 404, `Err` for anything else.
    async fn exists(&self, id: DbId) -> Result<bool, PersistanceError>;

    async fn stats(&self, id: DbId) -> Result<RecipeStats, PersistanceError>;
}

/// A file received from a client, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A downloaded file body with the headers worth relaying.
#[derive(Debug, Clone, Default)]
pub struct FileContent {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub bytes: Vec<u8>,
}

/// Attachment operations offered by the persistence service.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(
        &self,
        recette_id: DbId,
        kind: FileKind,
        upload: FileUpload,
    ) -> Result<RecipeFile, PersistanceError>;

    /// Every attachment when `kind` is `None`, otherwise one category.
    async fn list(
        &self,
        recette_id: DbId,
        kind: Option<FileKind>,
    ) -> Result<Vec<RecipeFile>, PersistanceError>;

    async fn metadata(&self, recette_id: DbId, file_id: DbId)
        -> Result<RecipeFile, PersistanceError>;

    async fn download(&self, recette_id: DbId, file_id: DbId)
        -> Result<FileContent, PersistanceError>;

    async fn content(&self, recette_id: DbId, file_id: DbId)
        -> Result<FileContent, PersistanceError>;

    async fn delete(&self, recette_id: DbId, file_id: DbId) -> Result<(), PersistanceError>;

    async fn delete_all(&self, recette_id: DbId) -> Result<(), PersistanceError>;
}
