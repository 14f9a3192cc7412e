// src/domain/article/entity.rs
use crate::domain::article::value_objects::{
    ArticleId, ArticleTitle, LanguageCode, VersionKey, VersionNumber,
};
use crate::domain::category::CategoryId;
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn is_archived(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleVersion {
    pub article_id: ArticleId,
    pub version: VersionNumber,
    pub tags: Vec<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<UserId>,
    pub released_at: Option<DateTime<Utc>>,
    pub released_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ArticleVersion {
    pub fn key(&self) -> VersionKey {
        VersionKey::new(self.article_id, self.version)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_released(&self, now: DateTime<Utc>) -> bool {
        self.released_at.is_some_and(|at| at <= now)
    }

    pub fn is_scheduled(&self, now: DateTime<Utc>) -> bool {
        self.released_at.is_some_and(|at| at > now)
    }

    /// Applies the mutable-field changes carried by `update`.
    pub fn apply(&mut self, update: &VersionStateUpdate) {
        if let Some(submission) = update.submission {
            self.submitted_at = submission.map(|stamp| stamp.at);
            self.submitted_by = submission.and_then(|stamp| stamp.by);
        }
        if let Some(release) = update.release {
            self.released_at = release.map(|stamp| stamp.at);
            self.released_by = release.and_then(|stamp| stamp.by);
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewArticleVersion {
    pub article_id: ArticleId,
    pub version: VersionNumber,
    pub tags: Vec<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<UserId>,
    pub released_at: Option<DateTime<Utc>>,
    pub released_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleVersionContent {
    pub article_id: ArticleId,
    pub version: VersionNumber,
    pub language: Option<LanguageCode>,
    pub title: ArticleTitle,
    pub description: Option<String>,
    pub body: String,
    pub search_tokens: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewArticleContent {
    pub language: Option<LanguageCode>,
    pub title: ArticleTitle,
    pub description: Option<String>,
    pub body: String,
}

impl NewArticleContent {
    /// Text fed to the tokenizer once the row is stored.
    pub fn searchable_text(&self) -> String {
        let mut text = String::from(self.title.as_str());
        if let Some(description) = &self.description {
            text.push(' ');
            text.push_str(description);
        }
        text.push(' ');
        text.push_str(&self.body);
        text
    }
}

/// Who did something, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub at: DateTime<Utc>,
    pub by: Option<UserId>,
}

impl Stamp {
    pub fn new(at: DateTime<Utc>, by: Option<UserId>) -> Self {
        Self { at, by }
    }
}

/// Changes to the mutable submission and release fields of a version.
/// `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionStateUpdate {
    pub key: VersionKey,
    pub submission: Option<Option<Stamp>>,
    pub release: Option<Option<Stamp>>,
}

impl VersionStateUpdate {
    pub fn new(key: VersionKey) -> Self {
        Self {
            key,
            submission: None,
            release: None,
        }
    }

    pub fn with_submission(mut self, stamp: Option<Stamp>) -> Self {
        self.submission = Some(stamp);
        self
    }

    pub fn with_release(mut self, stamp: Option<Stamp>) -> Self {
        self.release = Some(stamp);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.submission.is_none() && self.release.is_none()
    }
}
