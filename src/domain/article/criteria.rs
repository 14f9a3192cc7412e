// src/domain/article/criteria.rs
use crate::domain::article::stage::Stage;
use crate::domain::article::value_objects::{ArticleId, LanguageCode, VersionNumber};
use crate::domain::category::CategoryId;
use crate::domain::signature::SignatureLevelId;

/// Which version of each article a read should pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    /// The version currently placed in `stage`. `level` is the signature
    /// level whose approval separates REVIEWING from VERIFIED; the planner
    /// needs it for both of those stages.
    Stage {
        stage: Stage,
        level: Option<SignatureLevelId>,
    },
    /// An explicit version number, regardless of stage.
    Exact(VersionNumber),
}

impl VersionSelector {
    pub fn stage(stage: Stage, level: Option<SignatureLevelId>) -> Self {
        Self::Stage { stage, level }
    }
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self::Stage {
            stage: Stage::Released,
            level: None,
        }
    }
}

/// Filters for article reads. An empty `ids` list means "any article".
#[derive(Debug, Clone, Default)]
pub struct ArticleCriteria {
    pub ids: Vec<ArticleId>,
    pub selector: VersionSelector,
    pub language: Option<LanguageCode>,
    pub categories: Vec<CategoryId>,
    pub search_tokens: Vec<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ArticleCriteria {
    pub fn for_article(id: ArticleId, selector: VersionSelector) -> Self {
        Self {
            ids: vec![id],
            selector,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: Option<LanguageCode>) -> Self {
        self.language = language;
        self
    }
}
