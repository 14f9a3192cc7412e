// tests/support/mocks/store.rs
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use quire_core::domain::article::{
    Article, ArticleCriteria, ArticleId, ArticleReadRepository, ArticleRecord, ArticleStore,
    ArticleTransaction, ArticleVersion, ArticleVersionContent, LanguageCode, NewArticle,
    NewArticleContent, NewArticleVersion, Stage, VersionKey, VersionNumber, VersionSelector,
    VersionStateUpdate,
};
use quire_core::domain::category::CategoryId;
use quire_core::domain::errors::{DomainError, DomainResult};
use quire_core::domain::signature::{
    NewSignature, Signature, SignatureId, SignatureLevelId, SignatureResult,
};

/// Every row, soft-deleted ones included.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub articles: Vec<Article>,
    pub versions: Vec<ArticleVersion>,
    pub contents: Vec<ArticleVersionContent>,
    pub signatures: Vec<Signature>,
    next_article_id: i64,
    next_signature_id: i64,
}

impl StoreState {
    fn live_versions(&self, id: ArticleId) -> impl Iterator<Item = &ArticleVersion> {
        self.versions
            .iter()
            .filter(move |version| version.article_id == id && version.deleted_at.is_none())
    }

    fn approval_at(&self, key: VersionKey, level: SignatureLevelId) -> Option<&Signature> {
        self.signatures.iter().find(|signature| {
            signature.article_id == key.article_id
                && signature.version == key.version
                && signature.is_live_approval_at(level)
        })
    }

    /// Same picks as the SQL planner.
    fn placed(
        &self,
        id: ArticleId,
        selector: VersionSelector,
        now: DateTime<Utc>,
    ) -> Option<ArticleVersion> {
        let mut live = self.live_versions(id);
        let picked = match selector {
            VersionSelector::Exact(number) => live.find(|version| version.version == number),
            VersionSelector::Stage { stage, level } => match stage {
                Stage::Draft => live
                    .filter(|v| v.submitted_at.is_none() && v.released_at.is_none())
                    .max_by_key(|v| (v.created_at, v.version)),
                Stage::Reviewing => live
                    .filter(|v| v.released_at.is_none() && v.submitted_at.is_some())
                    .filter(|v| match level {
                        Some(level) => self.approval_at(v.key(), level).is_none(),
                        None => true,
                    })
                    .max_by_key(|v| (v.submitted_at, v.version)),
                Stage::Verified => {
                    let level = level?;
                    live.filter(|v| v.released_at.is_none())
                        .filter_map(|v| {
                            self.approval_at(v.key(), level)
                                .map(|signature| (signature.signed_at, v))
                        })
                        .max_by_key(|(signed_at, v)| (*signed_at, v.version))
                        .map(|(_, v)| v)
                }
                Stage::Scheduled => live
                    .filter(|v| v.released_at.is_some_and(|at| at > now))
                    .min_by(|a, b| match a.released_at.cmp(&b.released_at) {
                        Ordering::Equal => b.version.cmp(&a.version),
                        other => other,
                    }),
                Stage::Released => live
                    .filter(|v| v.released_at.is_some_and(|at| at <= now))
                    .max_by_key(|v| (v.released_at, v.version)),
            },
        };
        picked.cloned()
    }

    fn version_mut(&mut self, key: VersionKey) -> Option<&mut ArticleVersion> {
        self.versions.iter_mut().find(|version| {
            version.key() == key && version.deleted_at.is_none()
        })
    }

    fn live_signatures(&self, key: VersionKey) -> Vec<Signature> {
        let mut found: Vec<Signature> = self
            .signatures
            .iter()
            .filter(|s| s.article_id == key.article_id && s.version == key.version && s.is_live())
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.signed_at, s.id.0));
        found
    }
}

fn content_matches_language(content: &ArticleVersionContent, language: Option<&LanguageCode>) -> bool {
    match (language, &content.language) {
        (None, _) | (_, None) => true,
        (Some(wanted), Some(actual)) => wanted == actual,
    }
}

/// In-memory `ArticleStore` + `ArticleReadRepository`. Transactions work on
/// a snapshot that replaces the shared state on commit, and only one
/// transaction runs at a time.
#[derive(Default)]
pub struct InMemoryArticleStore {
    state: Arc<Mutex<StoreState>>,
    gate: Arc<AsyncMutex<()>>,
    transactions: AtomicUsize,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    /// Number of transactions begun so far.
    pub fn transactions(&self) -> usize {
        self.transactions.load(AtomicOrdering::SeqCst)
    }

    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, AtomicOrdering::SeqCst);
    }

    /// Live versions of the article that `stage` would pick, ignoring rank.
    pub fn stage_candidates(
        &self,
        id: i64,
        stage: Stage,
        level: Option<SignatureLevelId>,
        now: DateTime<Utc>,
    ) -> Vec<i32> {
        let state = self.state.lock().unwrap();
        let id = ArticleId::new(id).unwrap();
        state
            .live_versions(id)
            .filter(|v| match stage {
                Stage::Draft => v.submitted_at.is_none() && v.released_at.is_none(),
                Stage::Reviewing => {
                    v.released_at.is_none()
                        && v.submitted_at.is_some()
                        && level.is_none_or(|level| state.approval_at(v.key(), level).is_none())
                }
                Stage::Verified => {
                    v.released_at.is_none()
                        && level.is_some_and(|level| state.approval_at(v.key(), level).is_some())
                }
                Stage::Scheduled => v.released_at.is_some_and(|at| at > now),
                Stage::Released => v.released_at.is_some_and(|at| at <= now),
            })
            .map(|v| i32::from(v.version))
            .collect()
    }

    /// Version numbers of the article, soft-deleted ones included.
    pub fn all_version_numbers(&self, id: i64) -> Vec<i32> {
        let state = self.state.lock().unwrap();
        state
            .versions
            .iter()
            .filter(|v| i64::from(v.article_id) == id)
            .map(|v| i32::from(v.version))
            .collect()
    }

    pub fn version(&self, id: i64, version: i32) -> Option<ArticleVersion> {
        let state = self.state.lock().unwrap();
        state
            .versions
            .iter()
            .find(|v| i64::from(v.article_id) == id && i32::from(v.version) == version)
            .cloned()
    }

    /// All signatures of a version, soft-deleted ones included.
    pub fn signatures_of(&self, id: i64, version: i32) -> Vec<Signature> {
        let state = self.state.lock().unwrap();
        state
            .signatures
            .iter()
            .filter(|s| i64::from(s.article_id) == id && i32::from(s.version) == version)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ArticleReadRepository for InMemoryArticleStore {
    async fn find_article(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .articles
            .iter()
            .find(|article| article.id == id && !article.is_archived())
            .cloned())
    }

    async fn find_version(&self, key: VersionKey) -> DomainResult<Option<ArticleVersion>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .live_versions(key.article_id)
            .find(|version| version.version == key.version)
            .cloned())
    }

    async fn latest_version(&self, id: ArticleId) -> DomainResult<Option<ArticleVersion>> {
        let state = self.state.lock().unwrap();
        Ok(state.live_versions(id).max_by_key(|v| v.version).cloned())
    }

    async fn max_version_number(&self, id: ArticleId) -> DomainResult<Option<VersionNumber>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .versions
            .iter()
            .filter(|v| v.article_id == id)
            .map(|v| v.version)
            .max())
    }

    async fn find_placed(
        &self,
        id: ArticleId,
        selector: VersionSelector,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<ArticleVersion>> {
        let state = self.state.lock().unwrap();
        Ok(state.placed(id, selector, now))
    }

    async fn find_records(
        &self,
        criteria: &ArticleCriteria,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<ArticleRecord>> {
        let state = self.state.lock().unwrap();
        let language = criteria.language.as_ref();

        let mut records: Vec<ArticleRecord> = state
            .articles
            .iter()
            .filter(|article| !article.is_archived())
            .filter(|article| criteria.ids.is_empty() || criteria.ids.contains(&article.id))
            .filter(|article| {
                criteria.categories.is_empty()
                    || article
                        .categories
                        .iter()
                        .any(|category| criteria.categories.contains(category))
            })
            .filter_map(|article| {
                let version = state.placed(article.id, criteria.selector, now)?;
                let contents: Vec<ArticleVersionContent> = state
                    .contents
                    .iter()
                    .filter(|c| c.article_id == version.article_id && c.version == version.version)
                    .cloned()
                    .collect();
                let filtering = language.is_some() || !criteria.search_tokens.is_empty();
                if filtering
                    && !contents.iter().any(|c| {
                        content_matches_language(c, language)
                            && criteria
                                .search_tokens
                                .iter()
                                .all(|token| c.search_tokens.contains(token))
                    })
                {
                    return None;
                }
                let contents = contents
                    .into_iter()
                    .filter(|c| content_matches_language(c, language))
                    .collect();
                let signatures = state.live_signatures(version.key());
                Some(ArticleRecord {
                    article: article.clone(),
                    version,
                    contents,
                    signatures,
                })
            })
            .collect();

        records.sort_by(|a, b| {
            b.version
                .created_at
                .cmp(&a.version.created_at)
                .then(b.article.id.cmp(&a.article.id))
        });
        let offset = criteria.offset.unwrap_or(0) as usize;
        let limit = criteria.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn begin(&self) -> DomainResult<Box<dyn ArticleTransaction>> {
        let guard = Arc::clone(&self.gate).lock_owned().await;
        self.transactions.fetch_add(1, AtomicOrdering::SeqCst);
        let working = self.state.lock().unwrap().clone();
        Ok(Box::new(InMemoryTransaction {
            _guard: guard,
            working,
            shared: Arc::clone(&self.state),
            fail_commit: Arc::clone(&self.fail_next_commit),
        }))
    }

    async fn store_search_tokens(
        &self,
        key: VersionKey,
        language: Option<&LanguageCode>,
        tokens: &[String],
    ) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        for content in state
            .contents
            .iter_mut()
            .filter(|c| c.article_id == key.article_id && c.version == key.version)
            .filter(|c| c.language.as_ref() == language)
        {
            content.search_tokens = tokens.to_vec();
        }
        Ok(())
    }
}

pub struct InMemoryTransaction {
    _guard: OwnedMutexGuard<()>,
    working: StoreState,
    shared: Arc<Mutex<StoreState>>,
    fail_commit: Arc<AtomicBool>,
}

#[async_trait]
impl ArticleTransaction for InMemoryTransaction {
    async fn insert_article(&mut self, article: NewArticle) -> DomainResult<Article> {
        self.working.next_article_id += 1;
        let created = Article {
            id: ArticleId::new(self.working.next_article_id)?,
            categories: article.categories,
            created_at: article.created_at,
            deleted_at: None,
        };
        self.working.articles.push(created.clone());
        Ok(created)
    }

    async fn replace_categories(
        &mut self,
        id: ArticleId,
        categories: &[CategoryId],
    ) -> DomainResult<()> {
        let article = self
            .working
            .articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or_else(DomainError::article_not_found)?;
        article.categories = categories.to_vec();
        Ok(())
    }

    async fn archive_article(&mut self, id: ArticleId, at: DateTime<Utc>) -> DomainResult<bool> {
        match self
            .working
            .articles
            .iter_mut()
            .find(|article| article.id == id && article.deleted_at.is_none())
        {
            Some(article) => {
                article.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_version(&mut self, version: NewArticleVersion) -> DomainResult<ArticleVersion> {
        let duplicate = self
            .working
            .versions
            .iter()
            .any(|v| v.article_id == version.article_id && v.version == version.version);
        if duplicate {
            return Err(DomainError::Conflict("article version already exists".into()));
        }
        let created = ArticleVersion {
            article_id: version.article_id,
            version: version.version,
            tags: version.tags,
            submitted_at: version.submitted_at,
            submitted_by: version.submitted_by,
            released_at: version.released_at,
            released_by: version.released_by,
            created_at: version.created_at,
            created_by: version.created_by,
            deleted_at: None,
        };
        self.working.versions.push(created.clone());
        Ok(created)
    }

    async fn insert_contents(
        &mut self,
        key: VersionKey,
        contents: Vec<NewArticleContent>,
    ) -> DomainResult<Vec<ArticleVersionContent>> {
        let stored: Vec<ArticleVersionContent> = contents
            .into_iter()
            .map(|content| ArticleVersionContent {
                article_id: key.article_id,
                version: key.version,
                language: content.language,
                title: content.title,
                description: content.description,
                body: content.body,
                search_tokens: Vec::new(),
            })
            .collect();
        self.working.contents.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn lock_version(&mut self, key: VersionKey) -> DomainResult<Option<ArticleVersion>> {
        Ok(self.working.version_mut(key).map(|version| version.clone()))
    }

    async fn update_version_state(
        &mut self,
        update: VersionStateUpdate,
    ) -> DomainResult<ArticleVersion> {
        let version = self
            .working
            .version_mut(update.key)
            .ok_or_else(DomainError::version_not_found)?;
        version.apply(&update);
        Ok(version.clone())
    }

    async fn soft_delete_version(
        &mut self,
        key: VersionKey,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        match self.working.version_mut(key) {
            Some(version) => {
                version.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete_released_except(
        &mut self,
        id: ArticleId,
        keep: VersionNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut retired = 0;
        for version in self.working.versions.iter_mut().filter(|v| {
            v.article_id == id
                && v.version != keep
                && v.deleted_at.is_none()
                && v.released_at.is_some_and(|at| at <= now)
        }) {
            version.deleted_at = Some(now);
            retired += 1;
        }
        Ok(retired)
    }

    async fn lock_signatures(&mut self, key: VersionKey) -> DomainResult<Vec<Signature>> {
        Ok(self.working.live_signatures(key))
    }

    async fn insert_signature(&mut self, signature: NewSignature) -> DomainResult<Signature> {
        let occupied = self.working.signatures.iter().any(|s| {
            s.is_live()
                && s.article_id == signature.key.article_id
                && s.version == signature.key.version
                && s.level_id == Some(signature.level_id)
        });
        if occupied {
            return Err(DomainError::Conflict("Already signed".into()));
        }
        self.working.next_signature_id += 1;
        let created = Signature {
            id: SignatureId(self.working.next_signature_id),
            article_id: signature.key.article_id,
            version: signature.key.version,
            level_id: Some(signature.level_id),
            result: signature.result,
            signer_id: signature.signer_id,
            reject_reason: match signature.result {
                SignatureResult::Rejected => signature.reject_reason,
                SignatureResult::Approved => None,
            },
            signed_at: signature.signed_at,
            deleted_at: None,
        };
        self.working.signatures.push(created.clone());
        Ok(created)
    }

    async fn soft_delete_signature(
        &mut self,
        id: SignatureId,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(signature) = self
            .working
            .signatures
            .iter_mut()
            .find(|s| s.id == id && s.is_live())
        {
            signature.deleted_at = Some(at);
        }
        Ok(())
    }

    async fn soft_delete_signatures(
        &mut self,
        key: VersionKey,
        at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut dropped = 0;
        for signature in self.working.signatures.iter_mut().filter(|s| {
            s.article_id == key.article_id && s.version == key.version && s.is_live()
        }) {
            signature.deleted_at = Some(at);
            dropped += 1;
        }
        Ok(dropped)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        if self.fail_commit.swap(false, AtomicOrdering::SeqCst) {
            return Err(DomainError::Persistence("connection reset during commit".into()));
        }
        let InMemoryTransaction { working, shared, .. } = *self;
        *shared.lock().unwrap() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}
