// src/application/commands/articles/withdraw.rs
use super::{ArticleCommandService, placement::retire, transaction::finish};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, Stage, StageInput, VersionStateUpdate},
        errors::DomainError,
    },
};

#[derive(Debug, Clone, Default)]
pub struct WithdrawArticleCommand {
    pub id: i64,
    /// Defaults to the released version, then the scheduled one.
    pub version: Option<i32>,
}

impl ArticleCommandService {
    pub async fn withdraw(&self, command: WithdrawArticleCommand) -> ApplicationResult<ArticleDto> {
        if !self.settings.draft_mode {
            return Err(DomainError::draft_mode_disabled().into());
        }
        let id = ArticleId::new(command.id)?;
        let ctx = self.stage_context().await?;
        let now = self.clock.now();

        let target = match command.version {
            Some(version) => self.current_version(id, Some(version)).await?,
            None => {
                self.read_repo
                    .find_article(id)
                    .await?
                    .ok_or_else(DomainError::article_not_found)?;
                let mut found = None;
                for stage in [Stage::Released, Stage::Scheduled] {
                    let selector = ctx.selector(stage, None)?;
                    found = self.read_repo.find_placed(id, selector, now).await?;
                    if found.is_some() {
                        break;
                    }
                }
                found.ok_or_else(|| {
                    ApplicationError::invalid_state("Article has no released or scheduled version")
                })?
            }
        };

        let stage = ctx
            .resolver()
            .resolve(StageInput::from_stored(&target, None), now);
        if target.released_at.is_none() || !stage.is_public() {
            return Err(ApplicationError::invalid_state(
                "Article version is not released or scheduled",
            ));
        }

        let next = if ctx.signature_enabled() {
            Stage::Verified
        } else {
            Stage::Draft
        };
        let displaced = self.probe_all(&ctx, id, &[next], now).await;
        let key = target.key();
        let mut update = VersionStateUpdate::new(key).with_release(None);
        if next == Stage::Draft {
            update = update.with_submission(None);
        }

        let mut tx = self.store.begin().await?;
        let outcome = async {
            retire(tx.as_mut(), &displaced, Some(key), now).await?;
            let retired = tx.soft_delete_released_except(id, key.version, now).await?;
            tx.update_version_state(update).await?;
            Ok::<_, ApplicationError>(retired)
        }
        .await;
        let retired = finish(tx, outcome).await?;

        tracing::info!(%key, from = %stage, retired, "version withdrawn");
        self.queries.load_version(key, None).await
    }
}
