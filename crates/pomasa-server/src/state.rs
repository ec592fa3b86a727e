use pomasa_core::catalog::{CatalogCache, Pattern};
use pomasa_core::config::Config;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Directory holding `generator.md`, the template and `patterns/`.
    pub data_dir: PathBuf,
    pub config: Arc<Config>,
    pub catalog: Arc<CatalogCache>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, config: Config) -> Self {
        Self {
            data_dir,
            config: Arc::new(config),
            catalog: Arc::new(CatalogCache::new()),
        }
    }

    /// Current catalog, re-parsed only when `patterns/README.md` changed.
    /// Blocking; call from `spawn_blocking`.
    pub fn patterns(&self) -> pomasa_core::Result<Arc<Vec<Pattern>>> {
        self.catalog.get(&self.data_dir)
    }
}
