// --- File: crates/barbershop_common/src/routes.rs ---
use axum::{http::Uri, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{not_found, BarbershopError};

/// Routes shared by every deployment: liveness probe.
pub fn routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unmatched paths, rendered like every other error.
pub async fn not_found_handler(uri: Uri) -> BarbershopError {
    not_found(format!("route {} does not exist", uri.path()))
}
