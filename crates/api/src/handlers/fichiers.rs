//! Handlers for `/api/recettes/{id}/fichiers`.
//!
//! Attachments are forwarded to MS-Persistance as-is; the gateway neither
//! stores nor caches them.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use recette_core::error::CoreError;
use recette_core::file::{FileKind, RecipeFile};
use recette_core::types::DbId;
use recette_persistance::{FileContent, FileUpload, PersistanceError};

use crate::error::{not_found_as, AppError, AppResult};
use crate::extract::{ApiMultipart, ApiPath};
use crate::state::AppState;

/// Fallback name when the multipart part carries none.
const DEFAULT_FILE_NAME: &str = "upload.bin";

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// POST /api/recettes/{id}/fichiers/images
pub async fn upload_image(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<RecipeFile>)> {
    upload(&state, recette_id, FileKind::Image, multipart).await
}

/// POST /api/recettes/{id}/fichiers/documents
pub async fn upload_document(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<RecipeFile>)> {
    upload(&state, recette_id, FileKind::Document, multipart).await
}

async fn upload(
    state: &AppState,
    recette_id: DbId,
    kind: FileKind,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<RecipeFile>)> {
    let file = read_file_field(multipart).await?;
    let size = file.bytes.len();

    let stored = state
        .files
        .upload(recette_id, kind, file)
        .await
        .map_err(missing_recipe(recette_id))?;

    tracing::info!(
        recette_id,
        kind = kind.path_segment(),
        size,
        file_id = stored.id,
        "File uploaded",
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Pull the `file` part out of a multipart body. Other parts are ignored.
async fn read_file_field(mut multipart: Multipart) -> AppResult<FileUpload> {
    let mut upload: Option<FileUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(FileUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    Ok(upload)
}

// ---------------------------------------------------------------------------
// Listing and metadata
// ---------------------------------------------------------------------------

/// GET /api/recettes/{id}/fichiers
pub async fn list_files(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
) -> AppResult<Json<Vec<RecipeFile>>> {
    let files = state
        .files
        .list(recette_id, None)
        .await
        .map_err(missing_recipe(recette_id))?;
    Ok(Json(files))
}

/// GET /api/recettes/{id}/fichiers/images
pub async fn list_images(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
) -> AppResult<Json<Vec<RecipeFile>>> {
    let files = state
        .files
        .list(recette_id, Some(FileKind::Image))
        .await
        .map_err(missing_recipe(recette_id))?;
    Ok(Json(files))
}

/// GET /api/recettes/{id}/fichiers/documents
pub async fn list_documents(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
) -> AppResult<Json<Vec<RecipeFile>>> {
    let files = state
        .files
        .list(recette_id, Some(FileKind::Document))
        .await
        .map_err(missing_recipe(recette_id))?;
    Ok(Json(files))
}

/// GET /api/recettes/{id}/fichiers/{file_id}
pub async fn file_metadata(
    State(state): State<AppState>,
    ApiPath((recette_id, file_id)): ApiPath<(DbId, DbId)>,
) -> AppResult<Json<RecipeFile>> {
    let file = state
        .files
        .metadata(recette_id, file_id)
        .await
        .map_err(missing_file(file_id))?;
    Ok(Json(file))
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// GET /api/recettes/{id}/fichiers/{file_id}/download
///
/// Served as an attachment unless MS-Persistance already named one.
pub async fn download_file(
    State(state): State<AppState>,
    ApiPath((recette_id, file_id)): ApiPath<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let content = state
        .files
        .download(recette_id, file_id)
        .await
        .map_err(missing_file(file_id))?;

    tracing::debug!(recette_id, file_id, size = content.bytes.len(), "File downloaded");
    Ok(relay(content, "attachment"))
}

/// GET /api/recettes/{id}/fichiers/{file_id}/content
///
/// Same bytes as the download, displayed inline by browsers.
pub async fn file_content(
    State(state): State<AppState>,
    ApiPath((recette_id, file_id)): ApiPath<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let content = state
        .files
        .content(recette_id, file_id)
        .await
        .map_err(missing_file(file_id))?;
    Ok(relay(content, "inline"))
}

fn relay(content: FileContent, default_disposition: &str) -> impl IntoResponse {
    let content_type = content
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = content
        .content_disposition
        .unwrap_or_else(|| default_disposition.to_string());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content.bytes,
    )
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/recettes/{id}/fichiers/{file_id}
pub async fn delete_file(
    State(state): State<AppState>,
    ApiPath((recette_id, file_id)): ApiPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state
        .files
        .delete(recette_id, file_id)
        .await
        .map_err(missing_file(file_id))?;

    tracing::info!(recette_id, file_id, "File deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/recettes/{id}/fichiers
pub async fn delete_all_files(
    State(state): State<AppState>,
    ApiPath(recette_id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    state
        .files
        .delete_all(recette_id)
        .await
        .map_err(missing_recipe(recette_id))?;

    tracing::info!(recette_id, "All files deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn missing_recipe(recette_id: DbId) -> impl FnOnce(PersistanceError) -> AppError {
    not_found_as(CoreError::recipe_not_found(recette_id))
}

fn missing_file(file_id: DbId) -> impl FnOnce(PersistanceError) -> AppError {
    not_found_as(CoreError::file_not_found(file_id))
}
