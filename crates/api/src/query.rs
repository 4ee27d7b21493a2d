//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for the popular/recent views. Clamped by the recipe service.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
