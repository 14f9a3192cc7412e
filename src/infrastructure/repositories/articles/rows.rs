// src/infrastructure/repositories/articles/rows.rs
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::article::{
    Article, ArticleId, ArticleTitle, ArticleVersion, ArticleVersionContent, LanguageCode,
    VersionNumber,
};
use crate::domain::category::CategoryId;
use crate::domain::errors::DomainError;
use crate::domain::signature::{Signature, SignatureId, SignatureLevelId};
use crate::domain::user::UserId;

pub(crate) const CONTENT_COLUMNS: &str =
    "article_id, version, language, title, description, body, search_tokens";

pub(crate) const SIGNATURE_COLUMNS: &str = "id, article_id, version, signature_level_id, result, \
    signer_id, reject_reason, signed_at, deleted_at";

#[derive(Debug, FromRow)]
pub(crate) struct ArticleRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ArticleRow {
    pub fn into_article(self, categories: Vec<CategoryId>) -> Result<Article, DomainError> {
        Ok(Article {
            id: ArticleId::new(self.id)?,
            categories,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct VersionRow {
    pub article_id: i64,
    pub version: i32,
    pub tags: Vec<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<i64>,
    pub released_at: Option<DateTime<Utc>>,
    pub released_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<VersionRow> for ArticleVersion {
    type Error = DomainError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(ArticleVersion {
            article_id: ArticleId::new(row.article_id)?,
            version: VersionNumber::new(row.version)?,
            tags: row.tags,
            submitted_at: row.submitted_at,
            submitted_by: row.submitted_by.map(UserId::new).transpose()?,
            released_at: row.released_at,
            released_by: row.released_by.map(UserId::new).transpose()?,
            created_at: row.created_at,
            created_by: row.created_by.map(UserId::new).transpose()?,
            deleted_at: row.deleted_at,
        })
    }
}

/// Article columns joined with its selected version.
#[derive(Debug, FromRow)]
pub(crate) struct PlacedRow {
    pub article_created_at: DateTime<Utc>,
    pub article_deleted_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    pub version: VersionRow,
}

#[derive(Debug, FromRow)]
pub(crate) struct ContentRow {
    pub article_id: i64,
    pub version: i32,
    pub language: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
    pub search_tokens: Vec<String>,
}

impl TryFrom<ContentRow> for ArticleVersionContent {
    type Error = DomainError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(ArticleVersionContent {
            article_id: ArticleId::new(row.article_id)?,
            version: VersionNumber::new(row.version)?,
            language: row.language.map(LanguageCode::new).transpose()?,
            title: ArticleTitle::new(row.title)?,
            description: row.description,
            body: row.body,
            search_tokens: row.search_tokens,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SignatureRow {
    pub id: i64,
    pub article_id: i64,
    pub version: i32,
    pub signature_level_id: Option<i64>,
    pub result: String,
    pub signer_id: Option<i64>,
    pub reject_reason: Option<String>,
    pub signed_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<SignatureRow> for Signature {
    type Error = DomainError;

    fn try_from(row: SignatureRow) -> Result<Self, Self::Error> {
        Ok(Signature {
            id: SignatureId(row.id),
            article_id: ArticleId::new(row.article_id)?,
            version: VersionNumber::new(row.version)?,
            level_id: row.signature_level_id.map(SignatureLevelId::new).transpose()?,
            result: row.result.parse()?,
            signer_id: row.signer_id.map(UserId::new).transpose()?,
            reject_reason: row.reject_reason,
            signed_at: row.signed_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CategoryBindingRow {
    pub article_id: i64,
    pub category_id: i64,
}
