//! Miscellaneous handlers.

use axum::Json;
use serde_json::{Value, json};

/// Health check. Unauthenticated.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
