// tests/support/mocks/catalog.rs
use std::sync::Mutex;

use async_trait::async_trait;
use quire_core::domain::{
    category::{Category, CategoryDirectory, CategoryId},
    errors::DomainResult,
    signature::{SignatureLevel, SignatureLevelId, SignatureLevelRepository},
};

pub fn level(id: i64, name: &str, sequence: i32, required: bool) -> SignatureLevel {
    SignatureLevel {
        id: SignatureLevelId::new(id).unwrap(),
        name: name.into(),
        sequence,
        required,
    }
}

/// Categories with ids in `bindable` exist and can be bound.
pub struct StaticCategoryDirectory {
    bindable: Vec<i64>,
}

impl StaticCategoryDirectory {
    pub fn new(bindable: &[i64]) -> Self {
        Self {
            bindable: bindable.to_vec(),
        }
    }
}

#[async_trait]
impl CategoryDirectory for StaticCategoryDirectory {
    async fn find_bindable_categories(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        Ok(ids
            .iter()
            .filter(|id| self.bindable.contains(&i64::from(**id)))
            .map(|id| Category {
                id: *id,
                name: format!("category-{}", i64::from(*id)),
            })
            .collect())
    }
}

/// Signature level table that tests can rewrite between refreshes.
pub struct StaticSignatureLevels {
    levels: Mutex<Vec<SignatureLevel>>,
}

impl StaticSignatureLevels {
    pub fn new(levels: Vec<SignatureLevel>) -> Self {
        Self {
            levels: Mutex::new(levels),
        }
    }

    pub fn replace(&self, levels: Vec<SignatureLevel>) {
        *self.levels.lock().unwrap() = levels;
    }
}

#[async_trait]
impl SignatureLevelRepository for StaticSignatureLevels {
    async fn list_ordered(&self) -> DomainResult<Vec<SignatureLevel>> {
        let mut levels = self.levels.lock().unwrap().clone();
        levels.sort_by_key(|level| (level.sequence, i64::from(level.id)));
        Ok(levels)
    }
}
