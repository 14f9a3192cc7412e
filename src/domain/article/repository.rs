// src/domain/article/repository.rs
use crate::domain::article::criteria::{ArticleCriteria, VersionSelector};
use crate::domain::article::entity::{
    Article, ArticleVersion, ArticleVersionContent, NewArticle, NewArticleContent,
    NewArticleVersion, VersionStateUpdate,
};
use crate::domain::article::value_objects::{ArticleId, LanguageCode, VersionKey, VersionNumber};
use crate::domain::category::CategoryId;
use crate::domain::errors::DomainResult;
use crate::domain::signature::{NewSignature, Signature, SignatureId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Canonical projection of one article at one selected version.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub article: Article,
    pub version: ArticleVersion,
    pub contents: Vec<ArticleVersionContent>,
    /// Live signatures of `version`.
    pub signatures: Vec<Signature>,
}

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    /// Live (not archived) article.
    async fn find_article(&self, id: ArticleId) -> DomainResult<Option<Article>>;
    /// Live version by key.
    async fn find_version(&self, key: VersionKey) -> DomainResult<Option<ArticleVersion>>;
    /// Highest live version of the article.
    async fn latest_version(&self, id: ArticleId) -> DomainResult<Option<ArticleVersion>>;
    /// Highest version number ever assigned, soft-deleted versions included.
    async fn max_version_number(&self, id: ArticleId) -> DomainResult<Option<VersionNumber>>;
    /// The version `selector` picks for the article, if any.
    async fn find_placed(
        &self,
        id: ArticleId,
        selector: VersionSelector,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<ArticleVersion>>;
    async fn find_records(
        &self,
        criteria: &ArticleCriteria,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<ArticleRecord>>;
}

/// Entry point for transactional writes.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn ArticleTransaction>>;

    /// Stores tokenizer output for a content row. Runs outside the workflow
    /// transaction.
    async fn store_search_tokens(
        &self,
        key: VersionKey,
        language: Option<&LanguageCode>,
        tokens: &[String],
    ) -> DomainResult<()>;
}

/// One open unit of work. Dropping it without `commit` discards every
/// change.
#[async_trait]
pub trait ArticleTransaction: Send {
    async fn insert_article(&mut self, article: NewArticle) -> DomainResult<Article>;
    async fn replace_categories(
        &mut self,
        id: ArticleId,
        categories: &[CategoryId],
    ) -> DomainResult<()>;
    async fn archive_article(&mut self, id: ArticleId, at: DateTime<Utc>) -> DomainResult<bool>;

    async fn insert_version(&mut self, version: NewArticleVersion) -> DomainResult<ArticleVersion>;
    async fn insert_contents(
        &mut self,
        key: VersionKey,
        contents: Vec<NewArticleContent>,
    ) -> DomainResult<Vec<ArticleVersionContent>>;
    /// Live version by key, locked for update.
    async fn lock_version(&mut self, key: VersionKey) -> DomainResult<Option<ArticleVersion>>;
    async fn update_version_state(
        &mut self,
        update: VersionStateUpdate,
    ) -> DomainResult<ArticleVersion>;
    async fn soft_delete_version(&mut self, key: VersionKey, at: DateTime<Utc>)
    -> DomainResult<bool>;
    /// Retires every live version of the article released at or before
    /// `now`, except `keep`.
    async fn soft_delete_released_except(
        &mut self,
        id: ArticleId,
        keep: VersionNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<u64>;

    /// Live signatures of the version, locked for update.
    async fn lock_signatures(&mut self, key: VersionKey) -> DomainResult<Vec<Signature>>;
    async fn insert_signature(&mut self, signature: NewSignature) -> DomainResult<Signature>;
    async fn soft_delete_signature(&mut self, id: SignatureId, at: DateTime<Utc>)
    -> DomainResult<()>;
    async fn soft_delete_signatures(&mut self, key: VersionKey, at: DateTime<Utc>)
    -> DomainResult<u64>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
