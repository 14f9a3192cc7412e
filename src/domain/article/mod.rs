// src/domain/article/mod.rs
pub mod criteria;
pub mod entity;
pub mod repository;
pub mod stage;
pub mod value_objects;

pub use criteria::{ArticleCriteria, VersionSelector};
pub use entity::{
    Article, ArticleVersion, ArticleVersionContent, NewArticle, NewArticleContent,
    NewArticleVersion, Stamp, VersionStateUpdate,
};
pub use repository::{ArticleReadRepository, ArticleRecord, ArticleStore, ArticleTransaction};
pub use stage::{Stage, StageInput, StageResolver, WorkflowSettings};
pub use value_objects::{ArticleId, ArticleTitle, LanguageCode, VersionKey, VersionNumber};
