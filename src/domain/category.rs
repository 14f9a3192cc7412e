// src/domain/category.rs
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(i64);

impl CategoryId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("category id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<CategoryId> for i64 {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Lookup into the category catalogue, which is owned elsewhere.
#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    /// Returns the subset of `ids` that exist and may be bound to an article.
    async fn find_bindable_categories(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>>;
}

/// Fails with the first requested id missing from `found`.
pub fn ensure_all_bindable(requested: &[CategoryId], found: &[Category]) -> DomainResult<()> {
    match requested
        .iter()
        .find(|id| !found.iter().any(|category| category.id == **id))
    {
        Some(missing) => Err(DomainError::category_not_found(i64::from(*missing))),
        None => Ok(()),
    }
}
