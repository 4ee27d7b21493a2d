//! REST client for the MS-Persistance HTTP endpoints.
//!
//! Every path lives under `{base_url}/api/persistance/recettes`. Calls are
//! made once with fixed timeouts; failures are reported, never retried.

use std::time::Duration;

use async_trait::async_trait;
use recette_core::file::{FileKind, RecipeFile};
use recette_core::recipe::{
    CreateRecipe, Recipe, RecipeStats, RecipeStatus, RejectionRequest, SearchCriteria,
    UpdateRecipe,
};
use recette_core::types::DbId;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::error::PersistanceError;
use crate::store::{FileContent, FileStore, FileUpload, RecipeStore};

/// Default time allowed to open a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for a whole request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const RECIPES_PATH: &str = "/api/persistance/recettes";

/// HTTP client for one persistence service instance.
#[derive(Debug, Clone)]
pub struct PersistanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl PersistanceClient {
    /// Build a client with its own connection pool.
    ///
    /// * `base_url` - e.g. `http://localhost:8090`; a trailing `/` is ignored.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, PersistanceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, RECIPES_PATH, path)
    }

    fn files_url(&self, recette_id: DbId, path: &str) -> String {
        self.url(&format!("/{recette_id}/fichiers{path}"))
    }

    // ---- private helpers ----

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, PersistanceError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn send_delete(&self, url: String) -> Result<(), PersistanceError> {
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await
    }

    async fn fetch_content(&self, url: String) -> Result<FileContent, PersistanceError> {
        tracing::debug!(%url, "GET (binary)");
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);
        let bytes = response.bytes().await?.to_vec();

        Ok(FileContent {
            content_type,
            content_disposition,
            bytes,
        })
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`PersistanceError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PersistanceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PersistanceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PersistanceError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), PersistanceError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for PersistanceClient {
    async fn create(&self, request: &CreateRecipe) -> Result<Recipe, PersistanceError> {
        let url = self.url("");
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(request).send().await?;
        Self::parse_response(response).await
    }

    async fn list_all(&self) -> Result<Vec<Recipe>, PersistanceError> {
        self.get_json(self.url("")).await
    }

    async fn get(&self, id: DbId) -> Result<Recipe, PersistanceError> {
        self.get_json(self.url(&format!("/{id}"))).await
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, PersistanceError> {
        let url = self.url("/search");
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(criteria).send().await?;
        Self::parse_response(response).await
    }

    async fn list_by_status(&self, status: RecipeStatus) -> Result<Vec<Recipe>, PersistanceError> {
        self.get_json(self.url(&format!("/{}", status.path_segment())))
            .await
    }

    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Recipe>, PersistanceError> {
        self.get_json(self.url(&format!("/utilisateur/{user_id}")))
            .await
    }

    async fn update(&self, id: DbId, request: &UpdateRecipe) -> Result<Recipe, PersistanceError> {
        let url = self.url(&format!("/{id}"));
        tracing::debug!(%url, "PUT");
        let response = self.client.put(url).json(request).send().await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, id: DbId) -> Result<(), PersistanceError> {
        self.send_delete(self.url(&format!("/{id}"))).await
    }

    async fn validate(&self, id: DbId) -> Result<Recipe, PersistanceError> {
        let url = self.url(&format!("/{id}/valider"));
        tracing::debug!(%url, "PUT");
        let response = self.client.put(url).send().await?;
        Self::parse_response(response).await
    }

    async fn reject(&self, id: DbId, motif: &str) -> Result<Recipe, PersistanceError> {
        let url = self.url(&format!("/{id}/rejeter"));
        let body = RejectionRequest {
            motif: Some(motif.to_string()),
        };
        tracing::debug!(%url, "PUT");
        let response = self.client.put(url).json(&body).send().await?;
        Self::parse_response(response).await
    }

    async fn exists(&self, id: DbId) -> Result<bool, PersistanceError> {
        let url = self.url(&format!("/{id}"));
        tracing::debug!(%url, "HEAD");
        let response = self.client.head(url).send().await?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(PersistanceError::Api {
                status: s.as_u16(),
                body: String::new(),
            }),
        }
    }

    async fn stats(&self, id: DbId) -> Result<RecipeStats, PersistanceError> {
        self.get_json(self.url(&format!("/{id}/stats"))).await
    }
}

#[async_trait]
impl FileStore for PersistanceClient {
    async fn upload(
        &self,
        recette_id: DbId,
        kind: FileKind,
        upload: FileUpload,
    ) -> Result<RecipeFile, PersistanceError> {
        let url = self.files_url(recette_id, &format!("/{}", kind.path_segment()));
        tracing::debug!(%url, file_name = %upload.file_name, size = upload.bytes.len(), "POST (multipart)");

        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        Self::parse_response(response).await
    }

    async fn list(
        &self,
        recette_id: DbId,
        kind: Option<FileKind>,
    ) -> Result<Vec<RecipeFile>, PersistanceError> {
        let path = kind
            .map(|k| format!("/{}", k.path_segment()))
            .unwrap_or_default();
        self.get_json(self.files_url(recette_id, &path)).await
    }

    async fn metadata(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<RecipeFile, PersistanceError> {
        self.get_json(self.files_url(recette_id, &format!("/{file_id}")))
            .await
    }

    async fn download(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<FileContent, PersistanceError> {
        self.fetch_content(self.files_url(recette_id, &format!("/{file_id}/download")))
            .await
    }

    async fn content(
        &self,
        recette_id: DbId,
        file_id: DbId,
    ) -> Result<FileContent, PersistanceError> {
        self.fetch_content(self.files_url(recette_id, &format!("/{file_id}/content")))
            .await
    }

    async fn delete(&self, recette_id: DbId, file_id: DbId) -> Result<(), PersistanceError> {
        self.send_delete(self.files_url(recette_id, &format!("/{file_id}")))
            .await
    }

    async fn delete_all(&self, recette_id: DbId) -> Result<(), PersistanceError> {
        self.send_delete(self.files_url(recette_id, "")).await
    }
}
