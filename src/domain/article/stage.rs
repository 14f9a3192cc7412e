// src/domain/article/stage.rs
use crate::domain::article::entity::ArticleVersion;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Lifecycle position of an article version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Draft,
    Reviewing,
    Verified,
    Scheduled,
    Released,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Draft,
        Stage::Reviewing,
        Stage::Verified,
        Stage::Scheduled,
        Stage::Released,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Draft => "DRAFT",
            Stage::Reviewing => "REVIEWING",
            Stage::Verified => "VERIFIED",
            Stage::Scheduled => "SCHEDULED",
            Stage::Released => "RELEASED",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Stage::Released | Stage::Scheduled)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DomainError::Validation(format!("unknown stage: {value}")))
    }
}

/// Feature switches that shape the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub draft_mode: bool,
    pub auto_release_after_approved: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            draft_mode: true,
            auto_release_after_approved: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageInput<'a> {
    pub submitted: bool,
    pub released_at: Option<DateTime<Utc>>,
    pub signature_level: Option<&'a str>,
}

impl<'a> StageInput<'a> {
    /// Maps a stored version onto resolver input. `final_approval` is the
    /// final level's name when the version holds a live approval at it.
    /// Approvals below the final level do not place a version on their own;
    /// `submitted_at` does.
    pub fn from_stored(version: &ArticleVersion, final_approval: Option<&'a str>) -> Self {
        if version.released_at.is_some() {
            return Self {
                released_at: version.released_at,
                ..Self::default()
            };
        }
        if final_approval.is_some() {
            return Self {
                signature_level: final_approval,
                ..Self::default()
            };
        }
        Self {
            submitted: version.submitted_at.is_some(),
            ..Self::default()
        }
    }
}

/// Decides the stage of a version. Used both when placing a new version and
/// when labelling stored ones.
#[derive(Debug, Clone, Copy)]
pub struct StageResolver<'a> {
    draft_mode: bool,
    final_level: Option<&'a str>,
}

impl<'a> StageResolver<'a> {
    pub fn new(draft_mode: bool, final_level: Option<&'a str>) -> Self {
        Self {
            draft_mode,
            final_level,
        }
    }

    pub fn signature_enabled(&self) -> bool {
        self.final_level.is_some()
    }

    pub fn resolve(&self, input: StageInput<'_>, now: DateTime<Utc>) -> Stage {
        if input.submitted {
            return Stage::Reviewing;
        }
        if let Some(level) = input.signature_level {
            return if Some(level) == self.final_level {
                Stage::Verified
            } else {
                Stage::Reviewing
            };
        }
        if let Some(released_at) = input.released_at {
            return if released_at > now {
                Stage::Scheduled
            } else {
                Stage::Released
            };
        }
        if self.draft_mode {
            Stage::Draft
        } else {
            Stage::Released
        }
    }

    pub fn ensure_enabled(&self, stage: Stage) -> DomainResult<()> {
        match stage {
            Stage::Draft if !self.draft_mode => Err(DomainError::draft_mode_disabled()),
            Stage::Reviewing | Stage::Verified if !self.signature_enabled() => {
                Err(DomainError::signature_disabled())
            }
            _ => Ok(()),
        }
    }
}
