// rest/routes/tasks.rs — Task CRUD routes.
//
// Validation and status-code mapping live here; the store below assumes
// normalized input. Store `NotFound` maps to 404, any other store error to a
// generic 500 — raw errors are never forwarded to the client.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::store::StoreError;
use crate::tasks::{normalize_title, NewTask, Task, TaskPatch, TaskStatus, TITLE_REQUIRED};
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn task_not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Task not found" })),
    )
}

fn internal(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

pub async fn list_tasks(State(ctx): State<Arc<AppContext>>) -> Json<Vec<Task>> {
    Json(ctx.store.list().await)
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    match ctx.store.get(&id).await {
        Ok(task) => Ok(Json(task)),
        Err(StoreError::NotFound) => Err(task_not_found()),
        Err(e) => {
            error!(err = %e, "failed to fetch task");
            Err(internal("Failed to fetch task"))
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let title = body
        .title
        .as_deref()
        .and_then(normalize_title)
        .ok_or_else(|| bad_request(TITLE_REQUIRED))?;

    let new = NewTask {
        title,
        description: body
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        status: body.status.unwrap_or_default(),
    };

    match ctx.store.create(new).await {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(e) => {
            error!(err = %e, "failed to create task");
            Err(internal("Failed to create task"))
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    // A provided title must survive trimming; an absent title keeps the
    // prior value.
    let title = match body.title.as_deref() {
        Some(raw) => Some(normalize_title(raw).ok_or_else(|| bad_request(TITLE_REQUIRED))?),
        None => None,
    };

    let patch = TaskPatch {
        title,
        description: body.description.map(|d| d.trim().to_string()),
        status: body.status,
    };

    match ctx.store.update(&id, patch).await {
        Ok(task) => Ok(Json(task)),
        Err(StoreError::NotFound) => Err(task_not_found()),
        Err(e) => {
            error!(err = %e, "failed to update task");
            Err(internal("Failed to update task"))
        }
    }
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match ctx.store.remove(&id).await {
        Ok(task) => Ok(Json(json!({
            "message": "Task deleted successfully",
            "task": task,
        }))),
        Err(StoreError::NotFound) => Err(task_not_found()),
        Err(e) => {
            error!(err = %e, "failed to delete task");
            Err(internal("Failed to delete task"))
        }
    }
}
