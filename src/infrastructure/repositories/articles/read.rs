// src/infrastructure/repositories/articles/read.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::planner::{PlacedVersions, VERSION_COLUMNS};
use super::rows::{
    ArticleRow, CONTENT_COLUMNS, CategoryBindingRow, ContentRow, PlacedRow, SIGNATURE_COLUMNS,
    SignatureRow, VersionRow,
};
use crate::domain::article::{
    Article, ArticleCriteria, ArticleId, ArticleReadRepository, ArticleRecord, ArticleVersion,
    ArticleVersionContent, VersionKey, VersionNumber, VersionSelector,
};
use crate::domain::category::CategoryId;
use crate::domain::errors::DomainResult;
use crate::domain::signature::Signature;
use crate::infrastructure::repositories::map_sqlx;

#[derive(Clone)]
pub struct PostgresArticleReadRepository {
    pool: PgPool,
}

impl PostgresArticleReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn categories_of(&self, ids: &[i64]) -> DomainResult<HashMap<i64, Vec<CategoryId>>> {
        let rows = sqlx::query_as::<_, CategoryBindingRow>(
            "SELECT article_id, category_id FROM article_categories
             WHERE article_id = ANY($1) ORDER BY category_id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut bound: HashMap<i64, Vec<CategoryId>> = HashMap::new();
        for row in rows {
            bound
                .entry(row.article_id)
                .or_default()
                .push(CategoryId::new(row.category_id)?);
        }
        Ok(bound)
    }

    async fn contents_of(
        &self,
        article_ids: &[i64],
        versions: &[i32],
        language: Option<&str>,
    ) -> DomainResult<Vec<ArticleVersionContent>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(CONTENT_COLUMNS);
        builder.push(
            " FROM article_version_contents WHERE (article_id, version) IN \
             (SELECT * FROM UNNEST(",
        );
        builder.push_bind(article_ids);
        builder.push("::bigint[], ");
        builder.push_bind(versions);
        builder.push("::int[]))");
        if let Some(language) = language {
            builder.push(" AND (language = ");
            builder.push_bind(language);
            builder.push(" OR language IS NULL)");
        }
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<ContentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?
            .into_iter()
            .map(ArticleVersionContent::try_from)
            .collect()
    }

    async fn signatures_of(
        &self,
        article_ids: &[i64],
        versions: &[i32],
    ) -> DomainResult<Vec<Signature>> {
        let query = format!(
            "SELECT {SIGNATURE_COLUMNS} FROM signatures
             WHERE deleted_at IS NULL AND (article_id, version) IN
                   (SELECT * FROM UNNEST($1::bigint[], $2::int[]))
             ORDER BY signed_at, id"
        );
        sqlx::query_as::<_, SignatureRow>(&query)
            .bind(article_ids)
            .bind(versions)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?
            .into_iter()
            .map(Signature::try_from)
            .collect()
    }
}

#[async_trait]
impl ArticleReadRepository for PostgresArticleReadRepository {
    async fn find_article(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, created_at, deleted_at FROM articles WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut categories = self.categories_of(&[row.id]).await?;
        let bound = categories.remove(&row.id).unwrap_or_default();
        row.into_article(bound).map(Some)
    }

    async fn find_version(&self, key: VersionKey) -> DomainResult<Option<ArticleVersion>> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM article_versions
             WHERE article_id = $1 AND version = $2 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(i64::from(key.article_id))
            .bind(i32::from(key.version))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(ArticleVersion::try_from).transpose()
    }

    async fn latest_version(&self, id: ArticleId) -> DomainResult<Option<ArticleVersion>> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM article_versions
             WHERE article_id = $1 AND deleted_at IS NULL
             ORDER BY version DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(ArticleVersion::try_from).transpose()
    }

    async fn max_version_number(&self, id: ArticleId) -> DomainResult<Option<VersionNumber>> {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(version) FROM article_versions WHERE article_id = $1",
        )
        .bind(i64::from(id))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        max.map(VersionNumber::new).transpose()
    }

    async fn find_placed(
        &self,
        id: ArticleId,
        selector: VersionSelector,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<ArticleVersion>> {
        let scope = [i64::from(id)];
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(VERSION_COLUMNS);
        builder.push(" FROM ");
        PlacedVersions::new(selector, now, &scope).push(&mut builder);
        builder.push(" pv LIMIT 1");

        let row = builder
            .build_query_as::<VersionRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(ArticleVersion::try_from).transpose()
    }

    async fn find_records(
        &self,
        criteria: &ArticleCriteria,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<ArticleRecord>> {
        let scope: Vec<i64> = criteria.ids.iter().copied().map(i64::from).collect();
        let categories: Vec<i64> = criteria.categories.iter().copied().map(i64::from).collect();
        let language = criteria.language.as_ref().map(|language| language.as_str());

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.created_at AS article_created_at, a.deleted_at AS article_deleted_at, pv.",
        );
        builder.push(VERSION_COLUMNS.replace(", ", ", pv."));
        builder.push(" FROM articles a JOIN ");
        PlacedVersions::new(criteria.selector, now, &scope).push(&mut builder);
        builder.push(" pv ON pv.article_id = a.id WHERE a.deleted_at IS NULL");

        if !categories.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM article_categories ac \
                 WHERE ac.article_id = a.id AND ac.category_id = ANY(",
            );
            builder.push_bind(&categories);
            builder.push("))");
        }
        if language.is_some() || !criteria.search_tokens.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM article_version_contents c \
                 WHERE c.article_id = pv.article_id AND c.version = pv.version",
            );
            if let Some(language) = language {
                builder.push(" AND (c.language = ");
                builder.push_bind(language);
                builder.push(" OR c.language IS NULL)");
            }
            if !criteria.search_tokens.is_empty() {
                builder.push(" AND c.search_tokens @> ");
                builder.push_bind(&criteria.search_tokens);
            }
            builder.push(")");
        }

        builder.push(" ORDER BY pv.created_at DESC, a.id DESC");
        if let Some(limit) = criteria.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(limit));
        }
        if let Some(offset) = criteria.offset {
            builder.push(" OFFSET ");
            builder.push_bind(i64::from(offset));
        }

        let rows = builder
            .build_query_as::<PlacedRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let article_ids: Vec<i64> = rows.iter().map(|row| row.version.article_id).collect();
        let versions: Vec<i32> = rows.iter().map(|row| row.version.version).collect();
        let mut bound = self.categories_of(&article_ids).await?;
        let contents = self.contents_of(&article_ids, &versions, language).await?;
        let signatures = self.signatures_of(&article_ids, &versions).await?;

        let mut contents_by_key: HashMap<VersionKey, Vec<ArticleVersionContent>> = HashMap::new();
        for content in contents {
            contents_by_key
                .entry(VersionKey::new(content.article_id, content.version))
                .or_default()
                .push(content);
        }
        let mut signatures_by_key: HashMap<VersionKey, Vec<Signature>> = HashMap::new();
        for signature in signatures {
            signatures_by_key
                .entry(VersionKey::new(signature.article_id, signature.version))
                .or_default()
                .push(signature);
        }

        rows.into_iter()
            .map(|row| {
                let article = ArticleRow {
                    id: row.version.article_id,
                    created_at: row.article_created_at,
                    deleted_at: row.article_deleted_at,
                };
                let categories = bound.remove(&article.id).unwrap_or_default();
                let article = article.into_article(categories)?;
                let version = ArticleVersion::try_from(row.version)?;
                let key = version.key();
                Ok(ArticleRecord {
                    article,
                    contents: contents_by_key.remove(&key).unwrap_or_default(),
                    signatures: signatures_by_key.remove(&key).unwrap_or_default(),
                    version,
                })
            })
            .collect()
    }
}
