// src/dtos/response.rs
use serde::Serialize;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response envelope shared by every action.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T, version: &'static str },
    Error { message: String, version: &'static str },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success {
            data,
            version: API_VERSION,
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
            version: API_VERSION,
        }
    }
}
