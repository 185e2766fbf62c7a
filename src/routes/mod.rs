// src/routes/mod.rs
pub mod actions;

use std::path::Path;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::dtos::response::{Envelope, API_VERSION};
use crate::state::AppState;

async fn banner() -> String {
    format!("Inventory API v{API_VERSION}")
}

async fn health_check() -> Json<Envelope<Value>> {
    Json(Envelope::success(json!({ "status": "ok" })))
}

/// Routes mounted under `/api`.
pub fn create_router(export_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/exec", get(actions::exec_get).post(actions::exec_post))
        .nest_service("/files", ServeDir::new(export_dir))
}
