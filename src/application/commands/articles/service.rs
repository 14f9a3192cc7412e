// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::{
    application::{
        error::ApplicationResult,
        ports::{search::Tokenizer, time::Clock},
        queries::articles::ArticleQueryService,
        signature_levels::SignatureLevelCache,
        stage_context::StageContext,
    },
    domain::{
        article::{
            ArticleId, ArticleReadRepository, ArticleStore, ArticleVersion, NewArticleContent,
            VersionKey, VersionNumber, WorkflowSettings,
        },
        category::{CategoryDirectory, CategoryId, ensure_all_bindable},
        errors::DomainError,
        signature::SignatureLevels,
    },
};

pub struct ArticleCommandService {
    pub(super) store: Arc<dyn ArticleStore>,
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) categories: Arc<dyn CategoryDirectory>,
    pub(super) tokenizer: Arc<dyn Tokenizer>,
    pub(super) level_cache: Arc<SignatureLevelCache>,
    pub(super) queries: Arc<ArticleQueryService>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: WorkflowSettings,
}

impl ArticleCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ArticleStore>,
        read_repo: Arc<dyn ArticleReadRepository>,
        categories: Arc<dyn CategoryDirectory>,
        tokenizer: Arc<dyn Tokenizer>,
        level_cache: Arc<SignatureLevelCache>,
        queries: Arc<ArticleQueryService>,
        clock: Arc<dyn Clock>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            store,
            read_repo,
            categories,
            tokenizer,
            level_cache,
            queries,
            clock,
            settings,
        }
    }

    pub async fn refresh_signature_levels(&self) -> ApplicationResult<Arc<SignatureLevels>> {
        self.level_cache.refresh().await
    }

    pub(super) async fn stage_context(&self) -> ApplicationResult<StageContext> {
        let levels = self.level_cache.current().await?;
        Ok(StageContext::new(levels, self.settings))
    }

    pub(super) async fn validate_categories(&self, ids: &[i64]) -> ApplicationResult<Vec<CategoryId>> {
        let ids = ids
            .iter()
            .copied()
            .map(CategoryId::new)
            .collect::<Result<Vec<_>, _>>()?;
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self.categories.find_bindable_categories(&ids).await?;
        ensure_all_bindable(&ids, &found)?;
        Ok(ids)
    }

    /// The requested version, or the highest live version of the article.
    pub(super) async fn current_version(
        &self,
        id: ArticleId,
        version: Option<i32>,
    ) -> ApplicationResult<ArticleVersion> {
        self.read_repo
            .find_article(id)
            .await?
            .ok_or_else(DomainError::article_not_found)?;
        let found = match version {
            Some(version) => {
                let key = VersionKey::new(id, VersionNumber::new(version)?);
                self.read_repo.find_version(key).await?
            }
            None => self.read_repo.latest_version(id).await?,
        };
        Ok(found.ok_or_else(DomainError::version_not_found)?)
    }

    /// Fills search tokens for freshly committed content. Failures are
    /// logged and otherwise ignored.
    pub(super) async fn index_contents(&self, key: VersionKey, contents: &[NewArticleContent]) {
        for content in contents {
            let tokens = self.tokenizer.tokenize(&content.searchable_text());
            if let Err(err) = self
                .store
                .store_search_tokens(key, content.language.as_ref(), &tokens)
                .await
            {
                tracing::warn!(%key, error = %err, "failed to store search tokens");
            }
        }
    }
}
