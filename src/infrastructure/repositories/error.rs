// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

const CNT_SIGNATURE_LIVE_LEVEL: &str = "signatures_live_level_key";
const CNT_VERSION_KEY: &str = "article_versions_pkey";
const CNT_CONTENT_LANGUAGE: &str = "article_version_contents_language_key";
const CNT_ARTICLE_CATEGORY: &str = "article_categories_category_id_fkey";
const CNT_VERSION_ARTICLE: &str = "article_versions_article_id_fkey";
const CNT_VERSION_NUMBER_CHECK: &str = "article_versions_version_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_SIGNATURE_LIVE_LEVEL => DomainError::Conflict("Already signed".into()),
                    CNT_VERSION_KEY => DomainError::Conflict("article version already exists".into()),
                    CNT_CONTENT_LANGUAGE => {
                        DomainError::Validation("duplicate content language".into())
                    }
                    CNT_ARTICLE_CATEGORY => DomainError::NotFound("category not found".into()),
                    CNT_VERSION_ARTICLE => DomainError::article_not_found(),
                    CNT_VERSION_NUMBER_CHECK => {
                        DomainError::Validation("version must be >= 1".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
