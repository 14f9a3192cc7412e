// src/application/ports/mod.rs
pub mod search;
pub mod time;
