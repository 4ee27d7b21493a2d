use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::handlers::home;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Root-level routes: banner and liveness.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::banner))
        .route("/health", get(health_check))
}
