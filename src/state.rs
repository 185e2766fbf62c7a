// src/state.rs
use std::path::PathBuf;
use std::sync::Arc;

use crate::store::TableStore;

/// Per-process settings the actions need besides the store.
#[derive(Debug, Clone)]
pub struct Settings {
    pub category_order: Vec<String>,
    pub export_dir: PathBuf,
    /// Prefix for export download links, e.g. `http://127.0.0.1:3000/api/files`.
    pub files_base_url: String,
    pub pdf_font_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }
}
