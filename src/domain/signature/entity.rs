// src/domain/signature/entity.rs
use crate::domain::article::{ArticleId, VersionKey, VersionNumber};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureLevelId(i64);

impl SignatureLevelId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "signature level id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<SignatureLevelId> for i64 {
    fn from(value: SignatureLevelId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureId(pub i64);

impl From<SignatureId> for i64 {
    fn from(value: SignatureId) -> Self {
        value.0
    }
}

/// One tier of the approval chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLevel {
    pub id: SignatureLevelId,
    pub name: String,
    pub sequence: i32,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureResult {
    Approved,
    Rejected,
}

impl SignatureResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureResult::Approved => "APPROVED",
            SignatureResult::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SignatureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureResult {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "APPROVED" => Ok(SignatureResult::Approved),
            "REJECTED" => Ok(SignatureResult::Rejected),
            other => Err(DomainError::Persistence(format!(
                "unknown signature result: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub id: SignatureId,
    pub article_id: ArticleId,
    pub version: VersionNumber,
    pub level_id: Option<SignatureLevelId>,
    pub result: SignatureResult,
    pub signer_id: Option<UserId>,
    pub reject_reason: Option<String>,
    pub signed_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Signature {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_live_approval_at(&self, level: SignatureLevelId) -> bool {
        self.is_live() && self.result == SignatureResult::Approved && self.level_id == Some(level)
    }
}

#[derive(Debug, Clone)]
pub struct NewSignature {
    pub key: VersionKey,
    pub level_id: SignatureLevelId,
    pub result: SignatureResult,
    pub signer_id: Option<UserId>,
    pub reject_reason: Option<String>,
    pub signed_at: DateTime<Utc>,
}
