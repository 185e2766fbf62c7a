// src/handlers/mod.rs
pub mod export;
pub mod inventory;
pub mod location;
pub mod location_product;
pub mod product;
pub mod supplier;

use crate::store::schema::numeric_suffix;

/// `prefix` + (highest numeric suffix among `existing` + 1), zero-padded to
/// three digits.
pub fn next_sequential_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let next = existing.map(numeric_suffix).max().unwrap_or(0) + 1;
    format!("{prefix}{next:03}")
}
