use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::application::task_service::TaskService;
use crate::domain::task::{CreateTask, Task, TaskExport, TaskFilter, UpdateTask};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> {
    pub service: S,
}

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    // Static segments are registered alongside the {id} capture; the router
    // matches them first, so /batch, /completed and /export never parse as ids.
    Router::new()
        .route("/api/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/api/tasks/batch", delete(batch_delete_tasks::<S>))
        .route("/api/tasks/batch/status", put(batch_update_status::<S>))
        .route("/api/tasks/completed", delete(delete_completed_tasks::<S>))
        .route("/api/tasks/export", get(export_tasks::<S>))
        .route(
            "/api/tasks/:id",
            get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    is_completed: Option<String>,
    priority: Option<i64>,
    search: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> TaskFilter {
        TaskFilter {
            // Anything other than "true" (case-insensitive) filters for open tasks.
            is_completed: self.is_completed.map(|v| v.eq_ignore_ascii_case("true")),
            priority: self.priority,
            search: self.search.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchIdsBody {
    #[serde(default)]
    ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct BatchStatusBody {
    #[serde(default)]
    ids: Vec<i64>,
    #[serde(default)]
    is_completed: bool,
}

async fn list_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.service.list(params.into_filter()).await?;
    Ok(Json(tasks))
}

async fn get_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let task = state.service.get(id).await?;
    Ok(Json(task))
}

async fn create_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = state.service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Task created" })),
    ))
}

async fn update_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTask>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // A nonexistent id still reports success; zero rows were touched.
    state.service.update(id, payload).await?;
    Ok(Json(json!({ "message": "Task updated" })))
}

async fn delete_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service.delete(id).await?;
    Ok(Json(json!({ "message": "Task deleted" })))
}

async fn batch_delete_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
    Json(body): Json<BatchIdsBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.service.batch_delete(&body.ids).await?;
    Ok(Json(json!({ "message": format!("Deleted {deleted} tasks") })))
}

async fn batch_update_status<S: TaskService>(
    State(state): State<AppState<S>>,
    Json(body): Json<BatchStatusBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state
        .service
        .batch_update_status(&body.ids, body.is_completed)
        .await?;
    Ok(Json(json!({ "message": format!("Updated {updated} tasks") })))
}

async fn delete_completed_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.service.delete_completed().await?;
    Ok(Json(
        json!({ "message": format!("Deleted {deleted} completed tasks") }),
    ))
}

async fn export_tasks<S: TaskService>(
    State(state): State<AppState<S>>,
) -> Result<Json<TaskExport>, ApiError> {
    let export = state.service.export_all().await?;
    Ok(Json(export))
}
