// src/infrastructure/repositories/mod.rs
pub mod articles;
mod categories;
mod error;
mod signature_levels;

pub use articles::{PostgresArticleReadRepository, PostgresArticleStore};
pub use categories::PostgresCategoryDirectory;
pub use error::map_sqlx;
pub use signature_levels::PostgresSignatureLevelRepository;
