//! Service banner and status.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

const APPLICATION_NAME: &str = "RecipeYouLove API";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub application_name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub contact: ContactResponse,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /
pub async fn banner() -> &'static str {
    "RecipeYouLove API is running successfully!"
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let contact = &state.config.contact;
    Json(StatusResponse {
        application_name: APPLICATION_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "Running",
        contact: ContactResponse {
            name: contact.name.clone(),
            email: contact.email.clone(),
        },
    })
}
