//! Application state for the web layer.

use std::sync::Arc;

use crate::search::SessionController;
use crate::search_api::Backend;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The one search session the server drives.
    pub controller: Arc<SessionController<Backend>>,
}

impl AppState {
    pub fn new(controller: SessionController<Backend>) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
