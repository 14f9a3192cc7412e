// src/application/stage_context.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    article::{ArticleVersion, Stage, StageInput, StageResolver, VersionSelector, WorkflowSettings},
    errors::DomainResult,
    signature::{Signature, SignatureLevels},
};

/// Snapshot of everything stage decisions depend on for one operation.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub levels: Arc<SignatureLevels>,
    pub settings: WorkflowSettings,
}

impl StageContext {
    pub fn new(levels: Arc<SignatureLevels>, settings: WorkflowSettings) -> Self {
        Self { levels, settings }
    }

    pub fn resolver(&self) -> StageResolver<'_> {
        StageResolver::new(self.settings.draft_mode, self.levels.final_level_name())
    }

    pub fn signature_enabled(&self) -> bool {
        self.levels.is_enabled()
    }

    /// Read selector for `stage`. REVIEWING is judged against the level at
    /// `level_index` when given; VERIFIED always uses the final level.
    pub fn selector(&self, stage: Stage, level_index: Option<usize>) -> DomainResult<VersionSelector> {
        self.resolver().ensure_enabled(stage)?;
        let level = match stage {
            Stage::Reviewing => level_index
                .and_then(|index| self.levels.get(index))
                .or_else(|| self.levels.final_level())
                .map(|level| level.id),
            Stage::Verified => self.levels.final_level().map(|level| level.id),
            _ => None,
        };
        Ok(VersionSelector::stage(stage, level))
    }

    /// Stage of a stored version given its live signatures.
    pub fn stage_of(
        &self,
        version: &ArticleVersion,
        signatures: &[Signature],
        now: DateTime<Utc>,
    ) -> Stage {
        let final_level = self.levels.final_level().map(|level| level.id);
        let final_approval = self
            .levels
            .effective_level(signatures)
            .filter(|level| Some(level.id) == final_level)
            .map(|level| level.name.as_str());
        self.resolver()
            .resolve(StageInput::from_stored(version, final_approval), now)
    }
}
