//! Liveness probe.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// Creates the health router. Public and independent of storage.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(|| async { Json(health_body()) }))
}

fn health_body() -> Value {
    json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })
}
