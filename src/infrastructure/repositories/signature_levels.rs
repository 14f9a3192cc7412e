// src/infrastructure/repositories/signature_levels.rs
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::signature::{SignatureLevel, SignatureLevelId, SignatureLevelRepository};

#[derive(Clone)]
pub struct PostgresSignatureLevelRepository {
    pool: PgPool,
}

impl PostgresSignatureLevelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SignatureLevelRow {
    id: i64,
    name: String,
    sequence: i32,
    required: bool,
}

impl TryFrom<SignatureLevelRow> for SignatureLevel {
    type Error = DomainError;

    fn try_from(row: SignatureLevelRow) -> Result<Self, Self::Error> {
        Ok(SignatureLevel {
            id: SignatureLevelId::new(row.id)?,
            name: row.name,
            sequence: row.sequence,
            required: row.required,
        })
    }
}

#[async_trait]
impl SignatureLevelRepository for PostgresSignatureLevelRepository {
    async fn list_ordered(&self) -> DomainResult<Vec<SignatureLevel>> {
        sqlx::query_as::<_, SignatureLevelRow>(
            "SELECT id, name, sequence, required FROM signature_levels ORDER BY sequence, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?
        .into_iter()
        .map(SignatureLevel::try_from)
        .collect()
    }
}
