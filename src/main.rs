// src/main.rs
mod config;
mod dtos;
mod error;
mod export;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StorageKind};
use crate::state::{AppState, Settings};
use crate::store::{CsvDirStore, MemoryStore, TableStore};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    // Open the sheet store
    let store: Arc<dyn TableStore> = match config.storage {
        StorageKind::Csv => match CsvDirStore::open(&config.data_dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(dir = %config.data_dir.display(), error = %e, "Failed to open data directory");
                return;
            }
        },
        StorageKind::Memory => Arc::new(MemoryStore::new()),
    };
    match store::ensure_sheets(store.as_ref()) {
        Ok(created) => {
            for sheet in created {
                tracing::info!(sheet = sheet.name(), "Created missing sheet");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to prepare sheets");
            return;
        }
    }

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error = %e, "Port in use, trying next");
                    }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                (l, addr)
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", config.port, config.host);
                return;
            }
        }
    };
    let (listener, addr) = listener;

    let base_url = config
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{addr}"));
    let settings = Settings {
        category_order: config.category_order.clone(),
        export_dir: config.export_dir.clone(),
        files_base_url: format!("{base_url}/api/files"),
        pdf_font_path: config.pdf_font_path.clone(),
    };
    let app_state = AppState::new(store, settings);

    let api = routes::create_router(&config.export_dir);
    let app = Router::new()
        .nest("/api", api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
    }
}
