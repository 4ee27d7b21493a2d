//! Route definitions for recipe attachments, nested under
//! `/recettes/{id}/fichiers`.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::fichiers;
use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Attachment routes.
///
/// ```text
/// GET    /                        -> list_files
/// DELETE /                        -> delete_all_files
/// GET    /images                  -> list_images
/// POST   /images                  -> upload_image
/// GET    /documents               -> list_documents
/// POST   /documents               -> upload_document
/// GET    /{file_id}               -> file_metadata
/// DELETE /{file_id}               -> delete_file
/// GET    /{file_id}/download      -> download_file
/// GET    /{file_id}/content       -> file_content
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(fichiers::list_files).delete(fichiers::delete_all_files),
        )
        .route(
            "/images",
            get(fichiers::list_images).post(fichiers::upload_image),
        )
        .route(
            "/documents",
            get(fichiers::list_documents).post(fichiers::upload_document),
        )
        .route(
            "/{file_id}",
            get(fichiers::file_metadata).delete(fichiers::delete_file),
        )
        .route("/{file_id}/download", get(fichiers::download_file))
        .route("/{file_id}/content", get(fichiers::file_content))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
