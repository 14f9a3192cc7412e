// src/application/error.rs
use crate::domain::errors::DomainError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Stable, machine-checkable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    ModeDisabled,
    InvalidState,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ModeDisabled => "mode_disabled",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// Failure raised inside a write transaction: recognised kinds pass
    /// through, anything else becomes a generic error keeping its message.
    pub fn from_transaction(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(DomainError::Persistence(msg)) => Self::Infrastructure(msg),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::Domain(err) => match err {
                DomainError::Validation(_) => ErrorKind::Validation,
                DomainError::NotFound(_) => ErrorKind::NotFound,
                DomainError::ModeDisabled(_) => ErrorKind::ModeDisabled,
                DomainError::InvalidState(_) => ErrorKind::InvalidState,
                DomainError::Conflict(_) => ErrorKind::Conflict,
                DomainError::Persistence(_) => ErrorKind::Internal,
            },
            ApplicationError::Validation(_) => ErrorKind::Validation,
            ApplicationError::NotFound(_) => ErrorKind::NotFound,
            ApplicationError::InvalidState(_) => ErrorKind::InvalidState,
            ApplicationError::Infrastructure(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            ApplicationError::Domain(err) => match err {
                DomainError::Validation(msg)
                | DomainError::NotFound(msg)
                | DomainError::ModeDisabled(msg)
                | DomainError::InvalidState(msg)
                | DomainError::Conflict(msg)
                | DomainError::Persistence(msg) => msg.clone(),
            },
            ApplicationError::Validation(msg)
            | ApplicationError::NotFound(msg)
            | ApplicationError::InvalidState(msg)
            | ApplicationError::Infrastructure(msg) => msg.clone(),
        }
    }
}
