// src/application/commands/articles/placement.rs
use chrono::{DateTime, Utc};

use super::ArticleCommandService;
use crate::{
    application::{error::ApplicationResult, stage_context::StageContext},
    domain::article::{ArticleId, ArticleTransaction, ArticleVersion, Stage, VersionKey},
};

impl ArticleCommandService {
    /// The version currently placed in `stage`, if it can be determined.
    /// Lookup failures, including a disabled stage, count as "nothing
    /// placed".
    pub(super) async fn probe_placed(
        &self,
        ctx: &StageContext,
        id: ArticleId,
        stage: Stage,
        level_index: Option<usize>,
        now: DateTime<Utc>,
    ) -> Option<ArticleVersion> {
        let selector = match ctx.selector(stage, level_index) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::debug!(%id, %stage, error = %err, "stage not probed");
                return None;
            }
        };
        match self.read_repo.find_placed(id, selector, now).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(%id, %stage, error = %err, "stage probe failed");
                None
            }
        }
    }

    pub(super) async fn probe_all(
        &self,
        ctx: &StageContext,
        id: ArticleId,
        stages: &[Stage],
        now: DateTime<Utc>,
    ) -> Vec<ArticleVersion> {
        let mut placed: Vec<ArticleVersion> = Vec::new();
        for stage in stages {
            if let Some(version) = self.probe_placed(ctx, id, *stage, None, now).await {
                if !placed.iter().any(|known| known.version == version.version) {
                    placed.push(version);
                }
            }
        }
        placed
    }
}

/// Soft-deletes each displaced occupant, leaving `keep` alone.
pub(super) async fn retire(
    tx: &mut dyn ArticleTransaction,
    occupants: &[ArticleVersion],
    keep: Option<VersionKey>,
    now: DateTime<Utc>,
) -> ApplicationResult<()> {
    for occupant in occupants {
        let key = occupant.key();
        if Some(key) == keep {
            continue;
        }
        if tx.soft_delete_version(key, now).await? {
            tracing::info!(%key, "retired displaced version");
        }
    }
    Ok(())
}
