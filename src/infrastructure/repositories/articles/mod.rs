// src/infrastructure/repositories/articles/mod.rs
pub mod planner;
mod read;
mod rows;
mod store;

pub use read::PostgresArticleReadRepository;
pub use store::{PostgresArticleStore, PostgresArticleTransaction};
