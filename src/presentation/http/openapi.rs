// src/presentation/http/openapi.rs
use crate::application::dto::{ArticleDto, SignatureLevelDto};
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleListResponse {
    pub items: Vec<ArticleDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignatureLevelsResponse {
    pub levels: Vec<SignatureLevelDto>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::articles::list_articles,
        crate::presentation::http::controllers::articles::get_article,
        crate::presentation::http::controllers::articles::create_article,
        crate::presentation::http::controllers::articles::add_version,
        crate::presentation::http::controllers::articles::archive_article,
        crate::presentation::http::controllers::articles::delete_version,
        crate::presentation::http::controllers::articles::release_article,
        crate::presentation::http::controllers::articles::withdraw_article,
        crate::presentation::http::controllers::articles::submit_article,
        crate::presentation::http::controllers::articles::put_back_article,
        crate::presentation::http::controllers::articles::approve_version,
        crate::presentation::http::controllers::articles::reject_version,
        crate::presentation::http::controllers::signature_levels::refresh_signature_levels,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            ArticleListResponse,
            SignatureLevelsResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::articles::ContentRequest,
            crate::presentation::http::controllers::articles::VersionRequest,
            crate::presentation::http::controllers::articles::SignatureLevelParam,
            crate::presentation::http::controllers::articles::CreateArticleRequest,
            crate::presentation::http::controllers::articles::AddVersionRequest,
            crate::presentation::http::controllers::articles::ReleaseRequest,
            crate::presentation::http::controllers::articles::WithdrawRequest,
            crate::presentation::http::controllers::articles::SubmitRequest,
            crate::presentation::http::controllers::articles::SignatureRequest,
            crate::application::dto::ArticleDto,
            crate::application::dto::ArticleContentDto,
            crate::application::dto::SignatureDto,
            crate::application::dto::SignatureLevelDto,
            crate::domain::article::Stage,
            crate::domain::signature::SignatureResult
        )
    ),
    tags(
        (name = "Articles", description = "Article and version management"),
        (name = "Workflow", description = "Stage transitions and approvals"),
        (name = "System", description = "System level endpoints")
    ),
    info(
        title = "Quire API",
        description = "Editorial versioning and approval workflow",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(serve_openapi))
}

pub fn snapshot_path() -> String {
    env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "docs/openapi.json".to_string())
}

pub fn write_openapi_snapshot() -> std::io::Result<()> {
    let document = ApiDoc::openapi();
    let output_path = snapshot_path();
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}
