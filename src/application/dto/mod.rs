// src/application/dto/mod.rs
pub mod articles;
pub mod signature_levels;

pub use articles::{ArticleContentDto, ArticleDto, SignatureDto};
pub use signature_levels::SignatureLevelDto;
