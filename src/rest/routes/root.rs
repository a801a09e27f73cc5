use axum::Json;
use serde_json::{json, Value};

/// API info envelope for clients probing the server root.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Task Manager API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "tasks": "/api/tasks",
        },
    }))
}
