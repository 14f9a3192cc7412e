// src/application/commands/articles/create.rs
use super::{
    ArticleCommandService,
    options::VersionInput,
    signature::{SigningRequest, sign_in_transaction},
    transaction::finish,
};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{NewArticle, NewArticleVersion, VersionKey, VersionNumber},
        signature::SignatureResult,
        user::UserId,
    },
};

#[derive(Debug, Clone, Default)]
pub struct CreateArticleCommand {
    pub user_id: Option<i64>,
    pub categories: Vec<i64>,
    pub input: VersionInput,
}

impl ArticleCommandService {
    pub async fn create(&self, command: CreateArticleCommand) -> ApplicationResult<ArticleDto> {
        let categories = self.validate_categories(&command.categories).await?;
        let user = command.user_id.map(UserId::new).transpose()?;
        let ctx = self.stage_context().await?;
        let now = self.clock.now();
        let plan = command.input.plan(&ctx, now)?;

        let mut tx = self.store.begin().await?;
        let outcome = async {
            let article = tx
                .insert_article(NewArticle {
                    categories: categories.clone(),
                    created_at: now,
                })
                .await?;

            let key = VersionKey::new(article.id, VersionNumber::FIRST);
            tx.insert_version(NewArticleVersion {
                article_id: article.id,
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
            Ok::<_, ApplicationError>(key)
        }
        .await;
        let key = finish(tx, outcome).await?;

        tracing::info!(article_id = %key.article_id, stage = %plan.target, "article created");
        self.index_contents(key, &plan.contents).await;
        self.queries.load_version(key, None).await
    }
}
