// src/infrastructure/repositories/categories.rs
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::map_sqlx;
use crate::domain::category::{Category, CategoryDirectory, CategoryId};
use crate::domain::errors::{DomainError, DomainResult};

#[derive(Clone)]
pub struct PostgresCategoryDirectory {
    pool: PgPool,
}

impl PostgresCategoryDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DomainError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId::new(row.id)?,
            name: row.name,
        })
    }
}

#[async_trait]
impl CategoryDirectory for PostgresCategoryDirectory {
    async fn find_bindable_categories(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        let ids: Vec<i64> = ids.iter().copied().map(i64::from).collect();
        sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name FROM categories
             WHERE id = ANY($1) AND bindable AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?
        .into_iter()
        .map(Category::try_from)
        .collect()
    }
}
