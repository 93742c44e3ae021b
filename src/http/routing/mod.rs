use axum::{routing::get, Json, Router};
use serde_json::json;

pub fn app(tasks: Router) -> Router {
    Router::new().route("/health", get(health)).merge(tasks)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Task API is running" }))
}
