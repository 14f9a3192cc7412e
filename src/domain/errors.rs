// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("mode disabled: {0}")]
    ModeDisabled(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn article_not_found() -> Self {
        Self::NotFound("article not found".into())
    }

    pub fn version_not_found() -> Self {
        Self::NotFound("article version not found".into())
    }

    pub fn category_not_found(id: i64) -> Self {
        Self::NotFound(format!("category {id} not found"))
    }

    pub fn draft_mode_disabled() -> Self {
        Self::ModeDisabled("draft mode is disabled".into())
    }

    pub fn signature_disabled() -> Self {
        Self::ModeDisabled("signature is disabled".into())
    }

    /// Every kind except `Persistence` is part of the client contract and is
    /// surfaced as-is after a rollback.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}
