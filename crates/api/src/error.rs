use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recette_core::error::CoreError;
use recette_persistance::PersistanceError;
use serde_json::{json, Map, Value};
use validator::ValidationErrors;

use crate::offload::OffloadError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON error envelope
/// `{ timestamp, status, error, code, message | errors }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `recette_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field-level validation failures on a request body.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// MS-Persistance could not be reached or answered with an error.
    #[error(transparent)]
    Downstream(#[from] PersistanceError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The gateway cannot take more work right now.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Map a downstream 404 to `not_found`, anything else to [`AppError::Downstream`].
///
/// ```ignore
/// store.get(id).await.map_err(not_found_as(CoreError::recipe_not_found(id)))?;
/// ```
pub fn not_found_as(not_found: CoreError) -> impl FnOnce(PersistanceError) -> AppError {
    move |err| {
        if err.is_not_found() {
            AppError::Core(not_found)
        } else {
            AppError::Downstream(err)
        }
    }
}

impl From<OffloadError> for AppError {
    fn from(err: OffloadError) -> Self {
        match err {
            OffloadError::Saturated { .. } | OffloadError::Closed => {
                AppError::Unavailable(err.to_string())
            }
            OffloadError::TaskFailed(msg) => AppError::InternalError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code, detail) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "Not found",
                    "NOT_FOUND",
                    Detail::Message(format!("{entity} with id {id} not found")),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "Validation error",
                    "VALIDATION_ERROR",
                    Detail::Message(msg.clone()),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Validation(errors) => {
                tracing::warn!(errors = %errors, "Request validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    "Validation error",
                    "VALIDATION_ERROR",
                    Detail::Fields(field_messages(errors)),
                )
            }

            // --- Downstream ---
            AppError::Downstream(err) => {
                tracing::warn!(error = %err, "Persistance service call failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                    "DOWNSTREAM_ERROR",
                    Detail::Message(err.to_string()),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid argument",
                "BAD_REQUEST",
                Detail::Message(msg.clone()),
            ),
            AppError::Unavailable(msg) => {
                tracing::warn!(reason = %msg, "Request rejected");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                    "SERVICE_UNAVAILABLE",
                    Detail::Message(msg.clone()),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "timestamp": chrono::Local::now().naive_local(),
            "status": status.as_u16(),
            "error": error,
            "code": code,
        });
        match detail {
            Detail::Message(message) => body["message"] = Value::String(message),
            Detail::Fields(fields) => body["errors"] = Value::Object(fields),
        }

        (status, axum::Json(body)).into_response()
    }
}

enum Detail {
    Message(String),
    Fields(Map<String, Value>),
}

fn internal() -> (StatusCode, &'static str, &'static str, Detail) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        "INTERNAL_ERROR",
        Detail::Message("An internal error occurred".to_string()),
    )
}

/// First message per invalid field, keyed by the field's wire name.
fn field_messages(errors: &ValidationErrors) -> Map<String, Value> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let err = errs.first()?;
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            Some((wire_name(&field), Value::String(message)))
        })
        .collect()
}

/// `temps_total` -> `tempsTotal`, matching the request JSON.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        assert_eq!(wire_name("temps_total"), "tempsTotal");
        assert_eq!(wire_name("note_moyenne_min"), "noteMoyenneMin");
        assert_eq!(wire_name("titre"), "titre");
    }
}
