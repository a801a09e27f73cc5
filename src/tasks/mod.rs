// tasks/mod.rs — Task model and shared field validation.
//
// The wire format is camelCase JSON (`createdAt`, `updatedAt`) matching the
// persisted document, so records round-trip between the data file and the
// HTTP responses without a mapping layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── TaskStatus ───────────────────────────────────────────────────────────────

/// Task lifecycle flag. Serializes lowercase (`"pending"` / `"completed"`).
///
/// Unknown status strings are rejected at deserialization time, so the store
/// never holds a status outside these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

// ─── Task ─────────────────────────────────────────────────────────────────────

/// A single task record as persisted and as returned over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID v4, assigned at creation, immutable. Lookup key for all
    /// single-record operations.
    pub id: String,
    /// Trimmed, never empty or whitespace-only.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Absent until the first successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated fields for an insert. `title` is already trimmed and non-empty;
/// construction goes through [`normalize_title`].
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Partial update: `None` fields keep their prior value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Client-facing message for a missing or blank title.
///
/// One shared contract for create and update — the API returns this exact
/// string for both, so clients match on a single message.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Trim a raw title and reject empty/whitespace-only input.
///
/// Returns the trimmed title, or `None` when nothing is left after trimming.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), json!("pending"));
        assert_eq!(
            serde_json::to_value(TaskStatus::Completed).unwrap(),
            json!("completed")
        );
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(serde_json::from_value::<TaskStatus>(json!("archived")).is_err());
        assert!(serde_json::from_value::<TaskStatus>(json!("Pending")).is_err());
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Buy milk  "), Some("Buy milk".to_string()));
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   "), None);
        assert_eq!(normalize_title("\t\n"), None);
    }

    #[test]
    fn task_serializes_camel_case_and_omits_updated_at() {
        let task = Task {
            id: "abc".to_string(),
            title: "A".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_none());
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn task_deserializes_without_optional_fields() {
        let value = json!({
            "id": "abc",
            "title": "A",
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.updated_at.is_none());
    }
}
