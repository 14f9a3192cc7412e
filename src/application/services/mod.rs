// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::articles::ArticleCommandService,
        ports::{search::Tokenizer, time::Clock},
        queries::articles::ArticleQueryService,
        signature_levels::SignatureLevelCache,
    },
    domain::{
        article::{ArticleReadRepository, ArticleStore, WorkflowSettings},
        category::CategoryDirectory,
        signature::SignatureLevelRepository,
    },
};

/// Everything the presentation layer needs, wired once at startup.
pub struct ApplicationServices {
    pub article_commands: Arc<ArticleCommandService>,
    pub article_queries: Arc<ArticleQueryService>,
    level_cache: Arc<SignatureLevelCache>,
    settings: WorkflowSettings,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        article_store: Arc<dyn ArticleStore>,
        article_read_repo: Arc<dyn ArticleReadRepository>,
        category_directory: Arc<dyn CategoryDirectory>,
        signature_level_repo: Arc<dyn SignatureLevelRepository>,
        tokenizer: Arc<dyn Tokenizer>,
        clock: Arc<dyn Clock>,
        settings: WorkflowSettings,
    ) -> Self {
        let level_cache = Arc::new(SignatureLevelCache::new(signature_level_repo));

        let article_queries = Arc::new(ArticleQueryService::new(
            Arc::clone(&article_read_repo),
            Arc::clone(&level_cache),
            Arc::clone(&tokenizer),
            Arc::clone(&clock),
            settings,
        ));

        let article_commands = Arc::new(ArticleCommandService::new(
            article_store,
            article_read_repo,
            category_directory,
            tokenizer,
            Arc::clone(&level_cache),
            Arc::clone(&article_queries),
            clock,
            settings,
        ));

        Self {
            article_commands,
            article_queries,
            level_cache,
            settings,
        }
    }

    pub fn signature_levels(&self) -> Arc<SignatureLevelCache> {
        Arc::clone(&self.level_cache)
    }

    pub fn settings(&self) -> WorkflowSettings {
        self.settings
    }
}
