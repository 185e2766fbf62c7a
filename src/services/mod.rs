// src/services/mod.rs
pub mod hierarchy;
pub mod matcher;
pub mod natural;
