// src/config.rs
use std::net::IpAddr;
use std::path::PathBuf;

use crate::services::hierarchy::DEFAULT_CATEGORY_ORDER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// One CSV file per sheet under `DATA_DIR`.
    Csv,
    /// Process-local tables, lost on exit.
    Memory,
}

/// Server configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    /// First port tried; up to 20 more are tried when it is taken.
    pub port: u16,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    /// Overrides the origin used in export file URLs.
    pub public_base_url: Option<String>,
    pub category_order: Vec<String>,
    /// TrueType font for PDF exports. Built-in Helvetica when unset.
    pub pdf_font_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST")
            .and_then(|h| h.parse().ok())
            .unwrap_or(IpAddr::from([127, 0, 0, 1]));
        let storage = match var("STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("csv") => StorageKind::Csv,
            Some("memory") => StorageKind::Memory,
            Some(other) => {
                tracing::warn!(storage = other, "Unknown STORAGE, using csv");
                StorageKind::Csv
            }
        };
        let category_order = var("CATEGORY_ORDER")
            .map(|order| {
                order
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|order| !order.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_ORDER.iter().map(|c| c.to_string()).collect());

        Self {
            host,
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
            storage,
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
            export_dir: var("EXPORT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("exports")),
            public_base_url: var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            category_order,
            pdf_font_path: var("PDF_FONT_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
        }
    }
}
