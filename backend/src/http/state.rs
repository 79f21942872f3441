//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::PropertyRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store handle, acquired once at startup
    pub repository: Arc<dyn PropertyRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }
}
