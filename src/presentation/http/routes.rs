// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{articles, signature_levels},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::Method,
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .route(
            "/api/v1/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/api/v1/articles/{id}",
            get(articles::get_article).delete(articles::archive_article),
        )
        .route("/api/v1/articles/{id}/versions", post(articles::add_version))
        .route(
            "/api/v1/articles/{id}/versions/{version}",
            delete(articles::delete_version),
        )
        .route(
            "/api/v1/articles/{id}/versions/{version}/approve",
            post(articles::approve_version),
        )
        .route(
            "/api/v1/articles/{id}/versions/{version}/reject",
            post(articles::reject_version),
        )
        .route("/api/v1/articles/{id}/release", post(articles::release_article))
        .route("/api/v1/articles/{id}/withdraw", post(articles::withdraw_article))
        .route("/api/v1/articles/{id}/submit", post(articles::submit_article))
        .route("/api/v1/articles/{id}/put-back", post(articles::put_back_article))
        .route(
            "/api/v1/signature-levels/refresh",
            post(signature_levels::refresh_signature_levels),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
