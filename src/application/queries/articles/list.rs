use super::{ArticleQueryService, find_by_id::select_version, service::present};
use crate::{
    application::{dto::ArticleDto, error::ApplicationResult},
    domain::{
        article::{ArticleCriteria, ArticleId, LanguageCode, Stage},
        category::CategoryId,
    },
};

#[derive(Debug, Clone, Default)]
pub struct ListArticlesQuery {
    pub ids: Vec<i64>,
    pub stage: Option<Stage>,
    pub version: Option<i32>,
    pub language: Option<String>,
    pub categories: Vec<i64>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

impl ArticleQueryService {
    pub async fn find_all(&self, query: ListArticlesQuery) -> ApplicationResult<Vec<ArticleDto>> {
        let ctx = self.stage_context().await?;
        let selector = select_version(&ctx, query.stage, query.version)?;
        let ids = query
            .ids
            .into_iter()
            .map(ArticleId::new)
            .collect::<Result<Vec<_>, _>>()?;
        let categories = query
            .categories
            .into_iter()
            .map(CategoryId::new)
            .collect::<Result<Vec<_>, _>>()?;
        let language = query.language.map(LanguageCode::new).transpose()?;
        let search_tokens = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| self.tokenizer.tokenize(text))
            .unwrap_or_default();

        let limit = if query.limit == 0 {
            DEFAULT_LIMIT
        } else {
            query.limit.min(MAX_LIMIT)
        };

        let criteria = ArticleCriteria {
            ids,
            selector,
            language,
            categories,
            search_tokens,
            limit: Some(limit),
            offset: Some(query.offset),
        };

        let now = self.clock.now();
        let records = self.read_repo.find_records(&criteria, now).await?;
        Ok(records
            .into_iter()
            .map(|record| present(record, &ctx, None, now))
            .collect())
    }
}
