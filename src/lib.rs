pub mod config;
pub mod rest;
pub mod store;
pub mod tasks;

use std::sync::Arc;

use config::DaemonConfig;
use store::TaskStore;

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<DaemonConfig>,
    pub store: Arc<TaskStore>,
    pub started_at: std::time::Instant,
}
