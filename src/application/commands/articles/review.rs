// src/application/commands/articles/review.rs
use super::{ArticleCommandService, placement::retire, transaction::finish};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, Stage, Stamp, VersionStateUpdate},
        errors::DomainError,
        user::UserId,
    },
};

const ALREADY_SUBMITTED: &str = "Article version already submitted";
const ALREADY_RELEASED: &str = "Article version already released";
const ALREADY_DRAFT: &str = "Article version already draft";

#[derive(Debug, Clone, Default)]
pub struct SubmitArticleCommand {
    pub id: i64,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PutBackCommand {
    pub id: i64,
}

impl ArticleCommandService {
    /// Sends the current draft to review.
    pub async fn submit(&self, command: SubmitArticleCommand) -> ApplicationResult<ArticleDto> {
        let ctx = self.stage_context().await?;
        if !ctx.signature_enabled() {
            return Err(DomainError::signature_disabled().into());
        }
        let id = ArticleId::new(command.id)?;
        let user = command.user_id.map(UserId::new).transpose()?;
        let now = self.clock.now();

        let current = self.current_version(id, None).await?;
        let key = current.key();
        let record = self.queries.load_record(key, now).await?;
        match ctx.stage_of(&record.version, &record.signatures, now) {
            Stage::Draft => {}
            Stage::Reviewing | Stage::Verified => {
                return Err(ApplicationError::invalid_state(ALREADY_SUBMITTED));
            }
            Stage::Scheduled | Stage::Released => {
                return Err(ApplicationError::invalid_state(ALREADY_RELEASED));
            }
        }

        let displaced = self.probe_all(&ctx, id, &[Stage::Reviewing], now).await;

        let mut tx = self.store.begin().await?;
        let outcome = async {
            retire(tx.as_mut(), &displaced, Some(key), now).await?;
            tx.update_version_state(
                VersionStateUpdate::new(key).with_submission(Some(Stamp::new(now, user))),
            )
            .await?;
            Ok::<_, ApplicationError>(())
        }
        .await;
        finish(tx, outcome).await?;

        tracing::info!(%key, "version submitted");
        self.queries.load_version(key, None).await
    }

    /// Returns the version under review to draft editing. Its signatures are
    /// discarded.
    pub async fn put_back(&self, command: PutBackCommand) -> ApplicationResult<ArticleDto> {
        if !self.settings.draft_mode {
            return Err(DomainError::draft_mode_disabled().into());
        }
        let ctx = self.stage_context().await?;
        let id = ArticleId::new(command.id)?;
        let now = self.clock.now();

        let current = self.current_version(id, None).await?;
        let key = current.key();
        let record = self.queries.load_record(key, now).await?;
        match ctx.stage_of(&record.version, &record.signatures, now) {
            Stage::Reviewing | Stage::Verified => {}
            Stage::Draft => return Err(ApplicationError::invalid_state(ALREADY_DRAFT)),
            Stage::Scheduled | Stage::Released => {
                return Err(ApplicationError::invalid_state(ALREADY_RELEASED));
            }
        }

        let displaced = self.probe_all(&ctx, id, &[Stage::Draft], now).await;

        let mut tx = self.store.begin().await?;
        let outcome = async {
            retire(tx.as_mut(), &displaced, Some(key), now).await?;
            let dropped = tx.soft_delete_signatures(key, now).await?;
            tx.update_version_state(VersionStateUpdate::new(key).with_submission(None))
                .await?;
            Ok::<_, ApplicationError>(dropped)
        }
        .await;
        let dropped = finish(tx, outcome).await?;

        tracing::info!(%key, signatures_dropped = dropped, "version put back");
        self.queries.load_version(key, None).await
    }
}
