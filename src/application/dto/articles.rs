use crate::domain::article::{ArticleRecord, ArticleVersionContent, Stage};
use crate::domain::signature::{Signature, SignatureResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An article as seen at one selected version.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleDto {
    pub id: i64,
    pub version: i32,
    pub stage: Stage,
    pub categories: Vec<i64>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_by: Option<i64>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub released_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<i64>,
    pub contents: Vec<ArticleContentDto>,
    pub signatures: Vec<SignatureDto>,
}

impl ArticleDto {
    pub fn from_record(record: ArticleRecord, stage: Stage) -> Self {
        let ArticleRecord {
            article,
            version,
            contents,
            signatures,
        } = record;
        Self {
            id: article.id.into(),
            version: version.version.into(),
            stage,
            categories: article.categories.into_iter().map(Into::into).collect(),
            tags: version.tags,
            submitted_at: version.submitted_at,
            submitted_by: version.submitted_by.map(Into::into),
            released_at: version.released_at,
            released_by: version.released_by.map(Into::into),
            created_at: version.created_at,
            created_by: version.created_by.map(Into::into),
            contents: contents.into_iter().map(Into::into).collect(),
            signatures: signatures.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleContentDto {
    #[serde(default)]
    pub language: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub body: String,
}

impl From<ArticleVersionContent> for ArticleContentDto {
    fn from(content: ArticleVersionContent) -> Self {
        Self {
            language: content.language.map(|language| language.as_str().to_string()),
            title: content.title.into_inner(),
            description: content.description,
            body: content.body,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignatureDto {
    #[serde(default)]
    pub signature_level_id: Option<i64>,
    pub result: SignatureResult,
    #[serde(default)]
    pub signer_id: Option<i64>,
    #[serde(default)]
    pub reject_reason: Option<String>,
    pub signed_at: DateTime<Utc>,
}

impl From<Signature> for SignatureDto {
    fn from(signature: Signature) -> Self {
        Self {
            signature_level_id: signature.level_id.map(Into::into),
            result: signature.result,
            signer_id: signature.signer_id.map(Into::into),
            reject_reason: signature.reject_reason,
            signed_at: signature.signed_at,
        }
    }
}
