//! Shared harness for the HTTP integration tests.
//!
//! The router is built with [`build_app_router`], the same function the
//! binary uses, on top of in-memory stores that stand in for MS-Persistance.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use recette_core::file::{FileKind, RecipeFile};
use recette_core::recipe::{
    CreateRecipe, Recipe, RecipeStats, RecipeStatus, SearchCriteria, UpdateRecipe,
};
use recette_core::types::DbId;
use recette_persistance::{FileContent, FileStore, FileUpload, PersistanceError, RecipeStore};
use tower::ServiceExt;

use recette_api::cache::RecipeCache;
use recette_api::config::{
    CacheConfig, ContactInfo, OffloadConfig, PersistanceConfig, ServerConfig,
};
use recette_api::offload::OffloadPool;
use recette_api::router::build_app_router;
use recette_api::services::RecipeService;
use recette_api::state::AppState;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        persistance: PersistanceConfig::default(),
        cache: CacheConfig::default(),
        offload: OffloadConfig::default(),
        contact: ContactInfo {
            name: Some("Equipe Recette".to_string()),
            email: Some("recette@example.com".to_string()),
        },
    }
}

/// Router plus handles on the fake stores behind it.
pub struct TestApp {
    pub router: Router,
    pub recipes: Arc<FakeRecipeStore>,
    pub files: Arc<FakeFileStore>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let recipes = Arc::new(FakeRecipeStore::default());
    let files = Arc::new(FakeFileStore::default());

    let service = RecipeService::new(recipes.clone(), RecipeCache::new(&config.cache));
    let state = AppState {
        config: Arc::new(config.clone()),
        recipes: Arc::new(service),
        files: files.clone(),
        offload: Arc::new(OffloadPool::new(&config.offload)),
    };

    TestApp {
        router: build_app_router(state, &config),
        recipes,
        files,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn recipe(id: DbId, titre: &str) -> Recipe {
    Recipe {
        id,
        titre: Some(titre.to_string()),
        actif: Some(true),
        statut: Some(RecipeStatus::Pending),
        ..Recipe::default()
    }
}

fn api_error(status: u16) -> PersistanceError {
    PersistanceError::Api {
        status,
        body: format!("status {status}"),
    }
}

// ---------------------------------------------------------------------------
// Fake recipe store
// ---------------------------------------------------------------------------

/// In-memory [`RecipeStore`] that counts calls per operation.
pub struct FakeRecipeStore {
    recipes: Mutex<BTreeMap<DbId, Recipe>>,
    next_id: AtomicI64,
    calls: Mutex<HashMap<&'static str, usize>>,
    failure: Mutex<Option<u16>>,
}

impl Default for FakeRecipeStore {
    fn default() -> Self {
        Self {
            recipes: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            calls: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
        }
    }
}

impl FakeRecipeStore {
    pub fn insert(&self, recipe: Recipe) {
        self.next_id.fetch_max(recipe.id + 1, Ordering::SeqCst);
        self.recipes.lock().unwrap().insert(recipe.id, recipe);
    }

    pub fn stored(&self, id: DbId) -> Option<Recipe> {
        self.recipes.lock().unwrap().get(&id).cloned()
    }

    /// Make every following call fail with the given downstream status.
    pub fn fail_with(&self, status: u16) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn enter(&self, operation: &'static str) -> Result<(), PersistanceError> {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
        match *self.failure.lock().unwrap() {
            Some(status) => Err(api_error(status)),
            None => Ok(()),
        }
    }

    fn filtered(&self, keep: impl Fn(&Recipe) -> bool) -> Vec<Recipe> {
        self.recipes
            .lock()
            .unwrap()
            .values()
            .filter(|r| keep(*r))
            .cloned()
            .collect()
    }

    fn modify(
        &self,
        id: DbId,
        change: impl FnOnce(&mut Recipe),
    ) -> Result<Recipe, PersistanceError> {
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes.get_mut(&id).ok_or_else(|| api_error(404))?;
        change(recipe);
        Ok(recipe.clone())
    }
}

#[async_trait]
impl RecipeStore for FakeRecipeStore {
    async fn create(&self, request: &CreateRecipe) -> Result<Recipe, PersistanceError> {
        self.enter("create")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let recipe = Recipe {
            id,
            titre: request.titre.clone(),
            description: request.description.clone(),
            temps_total: request.temps_total,
            kcal: request.kcal,
            image_url: request.image_url.clone(),
            difficulte: request.difficulte.map(|d| d.as_str().to_string()),
            categorie: request.categorie.clone(),
            actif: Some(true),
            statut: Some(RecipeStatus::Pending),
            tags: request.tags.clone().unwrap_or_default(),
            utilisateur_id: request.utilisateur_id,
            ..Recipe::default()
        };
        self.recipes.lock().unwrap().insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn list_all(&self) -> Result<Vec<Recipe>, PersistanceError> {
        self.enter("list_all")?;
        Ok(self.filtered(|_| true))
    }

    async fn get(&self, id: DbId) -> Result<Recipe, PersistanceError> {
        self.enter("get")?;
        self.stored(id).ok_or_else(|| api_error(404))
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, PersistanceError> {
        self.enter("search")?;
        let categorie = criteria.categorie.clone();
        Ok(self.filtered(|r| categorie.is_none() || r.categorie == categorie))
    }

    async fn list_by_status(&self, status: RecipeStatus) -> Result<Vec<Recipe>, PersistanceError> {
        self.enter("list_by_status")?;
        Ok(self.filtered(|r| r.statut == Some(status)))
    }

    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Recipe>, PersistanceError> {
        self.enter("list_by_user")?;
        Ok(self.filtered(|r| r.utilisateur_id == Some(user_id)))
    }

    async fn update(&self, id: DbId, request: &UpdateRecipe) -> Result<Recipe, PersistanceError> {
        self.enter("update")?;
        self.modify(id, |recipe| {
            if let Some(titre) = &request.titre {
                recipe.titre = Some(titre.clone());
            }
            if let Some(categorie) = &request.categorie {
                recipe.categorie = Some(categorie.clone());
            }
            if let Some(temps) = request.temps_total {
                recipe.temps_total = Some(temps);
            }
            if let Some(kcal) = request.kcal {
                recipe.kcal = Some(kcal);
            }
        })
    }

    async fn delete(&self, id: DbId) -> Result<(), PersistanceError> {
        self.enter("delete")?;
        self.recipes
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| api_error(404))
    }

    async fn validate(&self, id: DbId) -> Result<Recipe, PersistanceError> {
        self.enter("validate")?;
        self.modify(id, |recipe| {
            recipe.statut = Some(RecipeStatus::Validated);
            recipe.motif_rejet = None;
        })
    }

    async fn reject(&self, id: DbId, motif: &str) -> Result<Recipe, PersistanceError> {
        self.enter("reject")?;
        self.modify(id, |recipe| {
            recipe.statut = Some(RecipeStatus::Rejected);
            recipe.motif_rejet = Some(motif.to_string());
        })
    }

    async fn exists(&self, id: DbId) -> Result<bool, PersistanceError> {
        self.enter("exists")?;
        Ok(self.stored(id).is_some())
    }

    async fn stats(&self, id: DbId) -> Result<RecipeStats, PersistanceError> {
        self.enter("stats")?;
        let recipe = self.stored(id).ok_or_else(|| api_error(404))?;
        Ok(RecipeStats {
            recette_id: Some(recipe.id),
            titre: recipe.titre,
            note_moyenne: recipe.note_moyenne,
            nombre_feedbacks: recipe.nombre_feedbacks,
            ..RecipeStats::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Fake file store
// ---------------------------------------------------------------------------

struct StoredFile {
    meta: RecipeFile,
    bytes: Vec<u8>,
}

/// In-memory [`FileStore`].
pub struct FakeFileStore {
    files: Mutex<Vec<StoredFile>>,
    next_id: AtomicI64,
    failure: Mutex<Option<u16>>,
}

impl Default for FakeFileStore {
    fn default() -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failure: Mutex::new(None),
        }
    }
}

impl FakeFileStore {
    pub fn fail_with(&self, status: u16) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn count(&self, recette_id: DbId) -> usize {
        self.files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.meta.recette_id == Some(recette_id))
            .count()
    }

    fn check(&self) -> Result<(), PersistanceError> {
        match *self.failure.lock().unwrap() {
            Some(status) => Err(api_error(status)),
            None => Ok(()),
        }
    }

    fn find<T>(
        &self,
        recette_id: DbId,
        file_id: DbId,
        read: impl FnOnce(&StoredFile) -> T,
    ) -> Result<T, PersistanceError> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.meta.recette_id == Some(recette_id) && f.meta.id == Some(file_id))
            .map(read)
            .ok_or_else(|| api_error(404))
    }
}

fn kind_label(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Image => "IMAGE",
        FileKind::Document => "DOCUMENT",
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn upload(
        &self,
        recette_id: DbId,
        kind: FileKind,
        upload: FileUpload,
    ) -> Result<RecipeFile, PersistanceError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let meta = RecipeFile {
            id: Some(id),
            recette_id: Some(recette_id),
            nom_original: Some(upload.file_name.clone()),
            nom_stockage: Some(format!("{id}-{}", upload.file_name)),
            content_type: upload.content_type.clone(),
            taille: Some(upload.bytes.len() as i64),
            kind: Some(kind_label(kind).to_string()),
            url: Some(format!("recettes/{recette_id}/{id}")),
            date_creation: None,
        };
        self.files.lock().unwrap().push(StoredFile {
            meta: meta.clone(),
            bytes: upload.bytes,
        });
        Ok(meta)
    }

    async fn list(
        &self,
        recette_id: DbId,
        kind: Option<FileKind>,
    ) -> Result<Vec<RecipeFile>, PersistanceError> {
        self.check()?;
        let label = kind.map(kind_label);
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.meta.recette_id == Some(recette_id))
            .filter(|f| label.is_none() || f.meta.kind.as_deref() == label)
            .map(|f| f.meta.clone())
            .collect())
    }

    async fn metadata(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<RecipeFile, PersistanceError> {
        self.check()?;
        self.find(recette_id, file_id, |f| f.meta.clone())
    }

    async fn download(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<FileContent, PersistanceError> {
        self.check()?;
        self.find(recette_id, file_id, |f| FileContent {
            content_type: f.meta.content_type.clone(),
            content_disposition: f
                .meta
                .nom_original
                .as_ref()
                .map(|name| format!("attachment; filename=\"{name}\"")),
            bytes: f.bytes.clone(),
        })
    }

    async fn content(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<FileContent, PersistanceError> {
        self.check()?;
        self.find(recette_id, file_id, |f| FileContent {
            content_type: f.meta.content_type.clone(),
            content_disposition: None,
            bytes: f.bytes.clone(),
        })
    }

    async fn delete(&self, recette_id: DbId, file_id: DbId) -> Result<(), PersistanceError> {
        self.check()?;
        let mut files = self.files.lock().unwrap();
        let index = files
            .iter()
            .position(|f| f.meta.recette_id == Some(recette_id) && f.meta.id == Some(file_id))
            .ok_or_else(|| api_error(404))?;
        files.remove(index);
        Ok(())
    }

    async fn delete_all(&self, recette_id: DbId) -> Result<(), PersistanceError> {
        self.check()?;
        self.files
            .lock()
            .unwrap()
            .retain(|f| f.meta.recette_id != Some(recette_id));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn with_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::PUT, uri, body).await
}

/// PUT with a raw (possibly empty or malformed) body.
pub async fn put_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "recette-test-boundary";

/// POST a multipart body with one part named `field`.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
