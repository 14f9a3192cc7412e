// src/application/commands/articles/archive.rs
use super::{ArticleCommandService, transaction::finish};
use crate::{
    application::error::ApplicationResult,
    domain::{
        article::{ArticleId, VersionKey, VersionNumber},
        errors::DomainError,
    },
};

#[derive(Debug, Clone)]
pub struct ArchiveArticleCommand {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct DeleteVersionCommand {
    pub id: i64,
    pub version: i32,
}

impl ArticleCommandService {
    pub async fn archive(&self, command: ArchiveArticleCommand) -> ApplicationResult<()> {
        let id = ArticleId::new(command.id)?;
        self.read_repo
            .find_article(id)
            .await?
            .ok_or_else(DomainError::article_not_found)?;

        let now = self.clock.now();
        let mut tx = self.store.begin().await?;
        let outcome = tx.archive_article(id, now).await.map_err(Into::into);
        let archived = finish(tx, outcome).await?;
        tracing::info!(%id, archived, "article archived");
        Ok(())
    }

    pub async fn delete_version(&self, command: DeleteVersionCommand) -> ApplicationResult<()> {
        let id = ArticleId::new(command.id)?;
        let key = VersionKey::new(id, VersionNumber::new(command.version)?);
        self.read_repo
            .find_version(key)
            .await?
            .ok_or_else(DomainError::version_not_found)?;

        let now = self.clock.now();
        let mut tx = self.store.begin().await?;
        let outcome = tx.soft_delete_version(key, now).await.map_err(Into::into);
        let deleted = finish(tx, outcome).await?;
        tracing::info!(%key, deleted, "version deleted");
        Ok(())
    }
}
