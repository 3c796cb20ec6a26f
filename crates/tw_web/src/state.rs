use std::sync::Arc;
use tw_core::ArticleStore;
use tw_scrapers::IngestionManager;

pub struct AppState {
    pub manager: Arc<IngestionManager>,
    pub store: Arc<dyn ArticleStore>,
}

impl AppState {
    /// Serves reads from the same store the manager writes to
    pub fn new(manager: Arc<IngestionManager>) -> Self {
        let store = manager.store();
        Self { manager, store }
    }
}
