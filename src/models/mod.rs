// src/models/mod.rs
pub mod inventory_record;
pub mod location;
pub mod product;
pub mod supplier;
