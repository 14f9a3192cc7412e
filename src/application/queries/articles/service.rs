use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
        ports::{search::Tokenizer, time::Clock},
        signature_levels::SignatureLevelCache,
        stage_context::StageContext,
        stage_hints::StageHints,
    },
    domain::article::{
        ArticleCriteria, ArticleReadRepository, ArticleRecord, VersionKey, VersionSelector,
        WorkflowSettings,
    },
};

pub struct ArticleQueryService {
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) level_cache: Arc<SignatureLevelCache>,
    pub(super) tokenizer: Arc<dyn Tokenizer>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: WorkflowSettings,
}

impl ArticleQueryService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        level_cache: Arc<SignatureLevelCache>,
        tokenizer: Arc<dyn Tokenizer>,
        clock: Arc<dyn Clock>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            read_repo,
            level_cache,
            tokenizer,
            clock,
            settings,
        }
    }

    pub(crate) async fn stage_context(&self) -> ApplicationResult<StageContext> {
        let levels = self.level_cache.current().await?;
        Ok(StageContext::new(levels, self.settings))
    }

    /// Re-reads one exact version after a mutation.
    pub(crate) async fn load_version(
        &self,
        key: VersionKey,
        hints: Option<&StageHints>,
    ) -> ApplicationResult<ArticleDto> {
        let ctx = self.stage_context().await?;
        let now = self.clock.now();
        let record = self.load_record(key, now).await?;
        Ok(present(record, &ctx, hints, now))
    }

    /// Exact version together with its live signatures.
    pub(crate) async fn load_record(
        &self,
        key: VersionKey,
        now: DateTime<Utc>,
    ) -> ApplicationResult<ArticleRecord> {
        let criteria =
            ArticleCriteria::for_article(key.article_id, VersionSelector::Exact(key.version));
        self.read_repo
            .find_records(&criteria, now)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::not_found("article version not found"))
    }
}

/// Labels a record with its stage, preferring a hint recorded earlier in the
/// same request.
pub(crate) fn present(
    record: ArticleRecord,
    ctx: &StageContext,
    hints: Option<&StageHints>,
    now: DateTime<Utc>,
) -> ArticleDto {
    let key = record.version.key();
    let stage = hints
        .and_then(|hints| hints.get(&key))
        .unwrap_or_else(|| ctx.stage_of(&record.version, &record.signatures, now));
    ArticleDto::from_record(record, stage)
}
