use super::{ArticleQueryService, service::present};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
        stage_context::StageContext,
        stage_hints::StageHints,
    },
    domain::article::{
        ArticleCriteria, ArticleId, LanguageCode, Stage, VersionNumber, VersionSelector,
    },
};

#[derive(Debug, Clone, Default)]
pub struct FindArticleQuery {
    pub id: i64,
    pub language: Option<String>,
    pub stage: Option<Stage>,
    pub version: Option<i32>,
}

impl ArticleQueryService {
    pub async fn find_by_id(
        &self,
        query: FindArticleQuery,
        hints: Option<&StageHints>,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(query.id)?;
        let ctx = self.stage_context().await?;
        let selector = select_version(&ctx, query.stage, query.version)?;
        let language = query.language.map(LanguageCode::new).transpose()?;
        let now = self.clock.now();

        let criteria = ArticleCriteria::for_article(id, selector).with_language(language);
        let record = self
            .read_repo
            .find_records(&criteria, now)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::not_found("article not found"))?;

        Ok(present(record, &ctx, hints, now))
    }
}

/// An explicit version wins over a stage filter; the stage defaults to
/// RELEASED.
pub(super) fn select_version(
    ctx: &StageContext,
    stage: Option<Stage>,
    version: Option<i32>,
) -> ApplicationResult<VersionSelector> {
    if let Some(version) = version {
        if let Some(stage) = stage {
            tracing::warn!(%stage, version, "both version and stage supplied; ignoring stage");
        }
        return Ok(VersionSelector::Exact(VersionNumber::new(version)?));
    }
    Ok(ctx.selector(stage.unwrap_or(Stage::Released), None)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        article::WorkflowSettings,
        errors::DomainError,
        signature::{SignatureLevel, SignatureLevelId, SignatureLevels},
    };
    use std::sync::Arc;

    fn ctx(draft_mode: bool, with_levels: bool) -> StageContext {
        let levels = if with_levels {
            vec![SignatureLevel {
                id: SignatureLevelId::new(4).unwrap(),
                name: "chief".into(),
                sequence: 1,
                required: true,
            }]
        } else {
            vec![]
        };
        StageContext::new(
            Arc::new(SignatureLevels::new(levels)),
            WorkflowSettings {
                draft_mode,
                auto_release_after_approved: false,
            },
        )
    }

    #[test]
    fn version_overrides_stage() {
        let selector = select_version(&ctx(true, false), Some(Stage::Draft), Some(3)).unwrap();
        assert_eq!(selector, VersionSelector::Exact(VersionNumber::new(3).unwrap()));
    }

    #[test]
    fn defaults_to_released() {
        let selector = select_version(&ctx(false, false), None, None).unwrap();
        assert_eq!(selector, VersionSelector::stage(Stage::Released, None));
    }

    #[test]
    fn verified_carries_final_level() {
        let selector = select_version(&ctx(true, true), Some(Stage::Verified), None).unwrap();
        assert_eq!(
            selector,
            VersionSelector::stage(Stage::Verified, Some(SignatureLevelId::new(4).unwrap()))
        );
    }

    #[test]
    fn gated_stages_fail_when_disabled() {
        let err = select_version(&ctx(false, false), Some(Stage::Draft), None).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::ModeDisabled(_))
        ));
        let err = select_version(&ctx(true, false), Some(Stage::Reviewing), None).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::ModeDisabled(_))
        ));
    }
}
