// src/application/commands/articles/add_version.rs
use super::{
    ArticleCommandService,
    options::VersionInput,
    placement::retire,
    signature::{SigningRequest, sign_in_transaction},
    transaction::finish,
};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleId, NewArticleVersion, VersionKey},
        errors::DomainError,
        signature::SignatureResult,
        user::UserId,
    },
};

#[derive(Debug, Clone, Default)]
pub struct AddVersionCommand {
    pub id: i64,
    pub user_id: Option<i64>,
    /// Replaces the article's category bindings when present.
    pub categories: Option<Vec<i64>>,
    pub input: VersionInput,
}

impl ArticleCommandService {
    pub async fn add_version(&self, command: AddVersionCommand) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.id)?;
        let user = command.user_id.map(UserId::new).transpose()?;
        let ctx = self.stage_context().await?;
        let now = self.clock.now();
        let plan = command.input.plan(&ctx, now)?;

        let displaced = self.probe_all(&ctx, id, &plan.displaces, now).await;

        let categories = match &command.categories {
            Some(ids) => Some(self.validate_categories(ids).await?),
            None => None,
        };
        self.read_repo
            .find_article(id)
            .await?
            .ok_or_else(DomainError::article_not_found)?;
        let latest = self
            .read_repo
            .max_version_number(id)
            .await?
            .ok_or_else(DomainError::version_not_found)?;
        let key = VersionKey::new(id, latest.next()?);

        let mut tx = self.store.begin().await?;
        let outcome = async {
            retire(tx.as_mut(), &displaced, None, now).await?;
            if let Some(categories) = &categories {
                tx.replace_categories(id, categories).await?;
            }
            tx.insert_version(NewArticleVersion {
                article_id: id,
                version: key.version,
                tags: plan.tags.clone(),
                submitted_at: plan.submitted_at,
                submitted_by: plan.submitted_at.and(user),
                released_at: plan.released_at,
                released_by: plan.released_at.and(user),
                created_at: now,
                created_by: user,
            })
            .await?;
            tx.insert_contents(key, plan.contents.clone()).await?;

            if let Some(level_index) = plan.sign_at {
                let request = SigningRequest {
                    key,
                    level_index,
                    result: SignatureResult::Approved,
                    signer: user,
                    reject_reason: None,
                };
                sign_in_transaction(tx.as_mut(), &ctx, &request, now).await?;
            }
            Ok::<_, ApplicationError>(())
        }
        .await;
        finish(tx, outcome).await?;

        tracing::info!(
            article_id = %id,
            version = %key.version,
            stage = %plan.target,
            retired = displaced.len(),
            "article version added"
        );
        self.index_contents(key, &plan.contents).await;
        self.queries.load_version(key, None).await
    }
}
