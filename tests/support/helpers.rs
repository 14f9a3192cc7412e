// tests/support/helpers.rs
use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;

use quire_core::application::{
    commands::articles::ArticleCommandService,
    ports::{search::Tokenizer, time::Clock},
    queries::articles::ArticleQueryService,
    services::ApplicationServices,
};
use quire_core::domain::{
    article::{ArticleReadRepository, ArticleStore, WorkflowSettings},
    category::CategoryDirectory,
    signature::{SignatureLevel, SignatureLevelRepository},
};
use quire_core::infrastructure::search::SimpleTokenizer;
use quire_core::presentation::http::{routes::build_router, state::HttpState};

use super::mocks::{InMemoryArticleStore, MockClock, StaticCategoryDirectory, StaticSignatureLevels};

/// Application services wired to in-memory adapters.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub store: Arc<InMemoryArticleStore>,
    pub clock: Arc<MockClock>,
    pub levels: Arc<StaticSignatureLevels>,
}

impl TestApp {
    pub fn new(settings: WorkflowSettings, levels: Vec<SignatureLevel>) -> Self {
        let store = Arc::new(InMemoryArticleStore::new());
        let clock = Arc::new(MockClock::new());
        let levels = Arc::new(StaticSignatureLevels::new(levels));

        let article_store: Arc<dyn ArticleStore> = store.clone();
        let article_read: Arc<dyn ArticleReadRepository> = store.clone();
        let categories: Arc<dyn CategoryDirectory> =
            Arc::new(StaticCategoryDirectory::new(&[1, 2, 3]));
        let level_repo: Arc<dyn SignatureLevelRepository> = levels.clone();
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(SimpleTokenizer);
        let app_clock: Arc<dyn Clock> = clock.clone();

        let services = Arc::new(ApplicationServices::new(
            article_store,
            article_read,
            categories,
            level_repo,
            tokenizer,
            app_clock,
            settings,
        ));

        Self {
            services,
            store,
            clock,
            levels,
        }
    }

    /// Draft mode on, auto release off.
    pub fn drafting(levels: Vec<SignatureLevel>) -> Self {
        Self::new(WorkflowSettings::default(), levels)
    }

    pub fn commands(&self) -> &ArticleCommandService {
        &self.services.article_commands
    }

    pub fn queries(&self) -> &ArticleQueryService {
        &self.services.article_queries
    }

    pub fn router(&self) -> axum::Router {
        build_router(HttpState {
            services: Arc::clone(&self.services),
        })
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
