// src/application/commands/articles/release.rs
use chrono::{DateTime, Utc};

use super::{ArticleCommandService, placement::retire, transaction::finish};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, Stage, Stamp, VersionStateUpdate},
        user::UserId,
    },
};

#[derive(Debug, Clone, Default)]
pub struct ReleaseArticleCommand {
    pub id: i64,
    pub version: Option<i32>,
    /// Defaults to now; a future date schedules the release.
    pub released_at: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}

impl ArticleCommandService {
    pub async fn release(&self, command: ReleaseArticleCommand) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.id)?;
        let user = command.user_id.map(UserId::new).transpose()?;
        let current = self.current_version(id, command.version).await?;
        let key = current.key();
        let now = self.clock.now();

        let already_released = current.is_released(now)
            || (command.released_at.is_some() && current.released_at == command.released_at);
        if already_released {
            tracing::debug!(%key, "version already released");
            return self.queries.load_version(key, None).await;
        }

        let released_at = command.released_at.unwrap_or(now);
        let stage = if released_at > now {
            Stage::Scheduled
        } else {
            Stage::Released
        };
        let ctx = self.stage_context().await?;
        let displaced = self.probe_all(&ctx, id, &[stage], now).await;

        let mut tx = self.store.begin().await?;
        let outcome = async {
            retire(tx.as_mut(), &displaced, Some(key), now).await?;
            tx.update_version_state(
                VersionStateUpdate::new(key).with_release(Some(Stamp::new(released_at, user))),
            )
            .await?;
            Ok::<_, ApplicationError>(())
        }
        .await;
        finish(tx, outcome).await?;

        tracing::info!(%key, %stage, %released_at, "version released");
        self.queries.load_version(key, None).await
    }
}
