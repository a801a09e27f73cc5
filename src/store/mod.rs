// store/mod.rs — JSON-file persistence for the task collection.
//
// Every mutation is a full load-mutate-save cycle against the backing
// document, serialized behind a single mutex so two racing requests cannot
// interleave their read-modify-write and drop a writer's change. Persistence
// goes through the `TaskBackend` trait so tests can substitute an in-memory
// backend for the JSON file.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::tasks::{NewTask, Task, TaskPatch};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task with the requested id exists.
    #[error("task not found")]
    NotFound,
    #[error("failed to write task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize task collection: {0}")]
    Json(#[from] serde_json::Error),
}

// ─── Persisted document ───────────────────────────────────────────────────────

/// On-disk layout: a single mapping with one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

// ─── TaskBackend ──────────────────────────────────────────────────────────────

/// Persistence seam for the task document.
///
/// Reads fail open: a backend returns an empty document rather than an error
/// when the underlying data is missing or unreadable, so a bad data file
/// never takes the API down. Writes propagate their errors — a failed save
/// is a real fault the caller must see.
pub trait TaskBackend: Send + Sync {
    fn load_document(&self) -> TaskDocument;
    fn save_document(&self, doc: &TaskDocument) -> Result<(), StoreError>;
}

/// Production backend: one pretty-printed JSON file.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TaskBackend for JsonFileBackend {
    fn load_document(&self) -> TaskDocument {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // First run — the file is created on the first save.
                debug!(path = %self.path.display(), "task file absent, starting empty");
                return TaskDocument::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "task file unreadable — starting empty");
                return TaskDocument::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "task file is not valid JSON — starting empty");
                TaskDocument::default()
            }
        }
    }

    fn save_document(&self, doc: &TaskDocument) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

/// In-memory backend for tests: same fail-open read semantics, no disk.
#[derive(Default)]
pub struct MemoryBackend {
    doc: std::sync::Mutex<TaskDocument>,
}

impl TaskBackend for MemoryBackend {
    fn load_document(&self) -> TaskDocument {
        self.doc.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn save_document(&self, doc: &TaskDocument) -> Result<(), StoreError> {
        if let Ok(mut guard) = self.doc.lock() {
            *guard = doc.clone();
        }
        Ok(())
    }
}

// ─── TaskStore ────────────────────────────────────────────────────────────────

/// The persistence abstraction over the task collection.
///
/// Insertion order is preserved: new tasks append, updates mutate in place,
/// and no operation reorders existing entries.
pub struct TaskStore {
    backend: Box<dyn TaskBackend>,
    // Serializes every load-mutate-save cycle. The guarded value is unit —
    // the document itself lives in the backend.
    lock: Mutex<()>,
}

impl TaskStore {
    pub fn new(backend: Box<dyn TaskBackend>) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    /// All tasks in insertion order. An absent or corrupt data file reads
    /// as an empty collection.
    pub async fn list(&self) -> Vec<Task> {
        let _guard = self.lock.lock().await;
        self.backend.load_document().tasks
    }

    /// Look up a single task by id.
    pub async fn get(&self, id: &str) -> Result<Task, StoreError> {
        let _guard = self.lock.lock().await;
        self.backend
            .load_document()
            .tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)
    }

    /// Insert a new task: assigns a fresh UUID and `createdAt`, appends, and
    /// persists. `new.title` is assumed normalized (trimmed, non-empty) —
    /// validation happens at the API boundary.
    pub async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.backend.load_document();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            status: new.status,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };
        doc.tasks.push(task.clone());
        self.backend.save_document(&doc)?;
        Ok(task)
    }

    /// Merge the provided fields into an existing task and stamp `updatedAt`.
    /// Fields left `None` in the patch keep their prior value.
    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.backend.load_document();
        let task = doc
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        task.updated_at = Some(chrono::Utc::now());
        let updated = task.clone();
        self.backend.save_document(&doc)?;
        Ok(updated)
    }

    /// Remove a task permanently and return the removed record.
    pub async fn remove(&self, id: &str) -> Result<Task, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.backend.load_document();
        let index = doc
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        let removed = doc.tasks.remove(index);
        self.backend.save_document(&doc)?;
        Ok(removed)
    }
}
