// src/application/signature_levels.rs
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    application::error::ApplicationResult,
    domain::signature::{SignatureLevelRepository, SignatureLevels},
};

/// In-memory copy of the configured approval chain. Loaded on first use and
/// replaced wholesale by `refresh`.
pub struct SignatureLevelCache {
    repo: Arc<dyn SignatureLevelRepository>,
    levels: RwLock<Option<Arc<SignatureLevels>>>,
}

impl SignatureLevelCache {
    pub fn new(repo: Arc<dyn SignatureLevelRepository>) -> Self {
        Self {
            repo,
            levels: RwLock::new(None),
        }
    }

    pub async fn current(&self) -> ApplicationResult<Arc<SignatureLevels>> {
        if let Some(levels) = self.levels.read().await.as_ref() {
            return Ok(Arc::clone(levels));
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> ApplicationResult<Arc<SignatureLevels>> {
        let levels = Arc::new(SignatureLevels::new(self.repo.list_ordered().await?));
        *self.levels.write().await = Some(Arc::clone(&levels));
        tracing::info!(levels = levels.len(), "signature levels loaded");
        Ok(levels)
    }
}
