//! Application state shared across handlers

use std::sync::Arc;

use crate::store::ItemStore;

/// Shared application state. Cloned once per request; the clone is an
/// `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    items: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { items }),
        }
    }

    pub fn items(&self) -> &dyn ItemStore {
        self.inner.items.as_ref()
    }
}
