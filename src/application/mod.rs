pub mod commands;
pub mod dto;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;
pub mod signature_levels;
pub mod stage_context;
pub mod stage_hints;

pub use error::ApplicationResult;
