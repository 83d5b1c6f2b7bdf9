use std::sync::Arc;

use crate::config::PaginationConfig;
use crate::database::StudentStore;

/// Collaborators injected into every handler
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn StudentStore>,
    pagination: PaginationConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }
}
