// src/infrastructure/repositories/articles/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::planner::VERSION_COLUMNS;
use super::rows::{ArticleRow, CONTENT_COLUMNS, ContentRow, SIGNATURE_COLUMNS, SignatureRow, VersionRow};
use crate::domain::article::{
    Article, ArticleId, ArticleStore, ArticleTransaction, ArticleVersion, ArticleVersionContent,
    LanguageCode, NewArticle, NewArticleContent, NewArticleVersion, VersionKey, VersionNumber,
    VersionStateUpdate,
};
use crate::domain::category::CategoryId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::signature::{NewSignature, Signature, SignatureId};
use crate::infrastructure::repositories::map_sqlx;

#[derive(Clone)]
pub struct PostgresArticleStore {
    pool: PgPool,
}

impl PostgresArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PostgresArticleStore {
    async fn begin(&self) -> DomainResult<Box<dyn ArticleTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx)?;
        Ok(Box::new(PostgresArticleTransaction { tx }))
    }

    async fn store_search_tokens(
        &self,
        key: VersionKey,
        language: Option<&LanguageCode>,
        tokens: &[String],
    ) -> DomainResult<()> {
        sqlx::query(
            "UPDATE article_version_contents SET search_tokens = $4
             WHERE article_id = $1 AND version = $2 AND language IS NOT DISTINCT FROM $3",
        )
        .bind(i64::from(key.article_id))
        .bind(i32::from(key.version))
        .bind(language.map(LanguageCode::as_str))
        .bind(tokens)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}

/// Unit of work over one pooled connection. Dropping it uncommitted rolls
/// back.
pub struct PostgresArticleTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PostgresArticleTransaction {
    async fn bind_categories(&mut self, id: i64, categories: &[CategoryId]) -> DomainResult<()> {
        if categories.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = categories.iter().copied().map(i64::from).collect();
        sqlx::query(
            "INSERT INTO article_categories (article_id, category_id)
             SELECT $1, UNNEST($2::bigint[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&ids)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl ArticleTransaction for PostgresArticleTransaction {
    async fn insert_article(&mut self, article: NewArticle) -> DomainResult<Article> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "INSERT INTO articles (created_at) VALUES ($1) RETURNING id, created_at, deleted_at",
        )
        .bind(article.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;

        self.bind_categories(row.id, &article.categories).await?;
        row.into_article(article.categories)
    }

    async fn replace_categories(
        &mut self,
        id: ArticleId,
        categories: &[CategoryId],
    ) -> DomainResult<()> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(i64::from(id))
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx)?;
        self.bind_categories(i64::from(id), categories).await
    }

    async fn archive_article(&mut self, id: ArticleId, at: DateTime<Utc>) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE articles SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(i64::from(id))
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_version(&mut self, version: NewArticleVersion) -> DomainResult<ArticleVersion> {
        let NewArticleVersion {
            article_id,
            version,
            tags,
            submitted_at,
            submitted_by,
            released_at,
            released_by,
            created_at,
            created_by,
        } = version;

        let query = format!(
            "INSERT INTO article_versions
                (article_id, version, tags, submitted_at, submitted_by, released_at, released_by,
                 created_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {VERSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(i64::from(article_id))
            .bind(i32::from(version))
            .bind(&tags)
            .bind(submitted_at)
            .bind(submitted_by.map(i64::from))
            .bind(released_at)
            .bind(released_by.map(i64::from))
            .bind(created_at)
            .bind(created_by.map(i64::from))
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx)?;

        ArticleVersion::try_from(row)
    }

    async fn insert_contents(
        &mut self,
        key: VersionKey,
        contents: Vec<NewArticleContent>,
    ) -> DomainResult<Vec<ArticleVersionContent>> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO article_version_contents (article_id, version, language, title, description, body) ",
        );
        builder.push_values(contents, |mut row, content| {
            row.push_bind(i64::from(key.article_id))
                .push_bind(i32::from(key.version))
                .push_bind(content.language.map(|language| language.as_str().to_string()))
                .push_bind(content.title.into_inner())
                .push_bind(content.description)
                .push_bind(content.body);
        });
        builder.push(" RETURNING ");
        builder.push(CONTENT_COLUMNS);

        builder
            .build_query_as::<ContentRow>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx)?
            .into_iter()
            .map(ArticleVersionContent::try_from)
            .collect()
    }

    async fn lock_version(&mut self, key: VersionKey) -> DomainResult<Option<ArticleVersion>> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM article_versions
             WHERE article_id = $1 AND version = $2 AND deleted_at IS NULL
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(i64::from(key.article_id))
            .bind(i32::from(key.version))
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx)?;

        row.map(ArticleVersion::try_from).transpose()
    }

    async fn update_version_state(
        &mut self,
        update: VersionStateUpdate,
    ) -> DomainResult<ArticleVersion> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE article_versions SET ");
        let mut fields = builder.separated(", ");
        if let Some(submission) = update.submission {
            fields.push("submitted_at = ");
            fields.push_bind_unseparated(submission.map(|stamp| stamp.at));
            fields.push("submitted_by = ");
            fields.push_bind_unseparated(submission.and_then(|stamp| stamp.by).map(i64::from));
        }
        if let Some(release) = update.release {
            fields.push("released_at = ");
            fields.push_bind_unseparated(release.map(|stamp| stamp.at));
            fields.push("released_by = ");
            fields.push_bind_unseparated(release.and_then(|stamp| stamp.by).map(i64::from));
        }
        if update.is_empty() {
            fields.push("version = version");
        }
        builder.push(" WHERE article_id = ");
        builder.push_bind(i64::from(update.key.article_id));
        builder.push(" AND version = ");
        builder.push_bind(i32::from(update.key.version));
        builder.push(" AND deleted_at IS NULL RETURNING ");
        builder.push(VERSION_COLUMNS);

        let row = builder
            .build_query_as::<VersionRow>()
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(DomainError::version_not_found)?;

        ArticleVersion::try_from(row)
    }

    async fn soft_delete_version(
        &mut self,
        key: VersionKey,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE article_versions SET deleted_at = $3
             WHERE article_id = $1 AND version = $2 AND deleted_at IS NULL",
        )
        .bind(i64::from(key.article_id))
        .bind(i32::from(key.version))
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_released_except(
        &mut self,
        id: ArticleId,
        keep: VersionNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE article_versions SET deleted_at = $3
             WHERE article_id = $1 AND version <> $2 AND deleted_at IS NULL
               AND released_at <= $3",
        )
        .bind(i64::from(id))
        .bind(i32::from(keep))
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn lock_signatures(&mut self, key: VersionKey) -> DomainResult<Vec<Signature>> {
        let query = format!(
            "SELECT {SIGNATURE_COLUMNS} FROM signatures
             WHERE article_id = $1 AND version = $2 AND deleted_at IS NULL
             ORDER BY signed_at, id
             FOR UPDATE"
        );
        sqlx::query_as::<_, SignatureRow>(&query)
            .bind(i64::from(key.article_id))
            .bind(i32::from(key.version))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx)?
            .into_iter()
            .map(Signature::try_from)
            .collect()
    }

    async fn insert_signature(&mut self, signature: NewSignature) -> DomainResult<Signature> {
        let query = format!(
            "INSERT INTO signatures
                (article_id, version, signature_level_id, result, signer_id, reject_reason, signed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SIGNATURE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SignatureRow>(&query)
            .bind(i64::from(signature.key.article_id))
            .bind(i32::from(signature.key.version))
            .bind(i64::from(signature.level_id))
            .bind(signature.result.as_str())
            .bind(signature.signer_id.map(i64::from))
            .bind(signature.reject_reason)
            .bind(signature.signed_at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx)?;

        Signature::try_from(row)
    }

    async fn soft_delete_signature(
        &mut self,
        id: SignatureId,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        sqlx::query("UPDATE signatures SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(i64::from(id))
            .bind(at)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn soft_delete_signatures(
        &mut self,
        key: VersionKey,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE signatures SET deleted_at = $3
             WHERE article_id = $1 AND version = $2 AND deleted_at IS NULL",
        )
        .bind(i64::from(key.article_id))
        .bind(i32::from(key.version))
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.tx.commit().await.map_err(map_sqlx)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.tx.rollback().await.map_err(map_sqlx)
    }
}
