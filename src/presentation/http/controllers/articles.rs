// src/presentation/http/controllers/articles.rs
use crate::application::{
    ApplicationResult,
    commands::articles::{
        AddVersionCommand, ArchiveArticleCommand, ContentCommand, CreateArticleCommand,
        DeleteVersionCommand, PutBackCommand, ReleaseArticleCommand, SignatureCommand,
        SubmitArticleCommand, VersionInput, WithdrawArticleCommand,
    },
    dto::ArticleDto,
    queries::articles::{FindArticleQuery, ListArticlesQuery},
    stage_hints::StageHints,
};
use crate::domain::{
    article::Stage,
    errors::DomainError,
    signature::{SignatureLevelId, SignatureLevelRef},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::openapi::{ArticleListResponse, StatusResponse};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ArticleListParams {
    /// Comma separated article ids.
    #[serde(default)]
    pub ids: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub language: Option<String>,
    /// Comma separated category ids.
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ArticleLookupParams {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub version: Option<i32>,
}

/// A level given either by id (`{"id": 2}`) or by name (`"legal"`).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SignatureLevelParam {
    Id { id: i64 },
    Name(String),
}

impl SignatureLevelParam {
    fn into_ref(self) -> ApplicationResult<SignatureLevelRef> {
        Ok(match self {
            SignatureLevelParam::Id { id } => SignatureLevelRef::Id(SignatureLevelId::new(id)?),
            SignatureLevelParam::Name(name) => SignatureLevelRef::Name(name),
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContentRequest {
    #[serde(default)]
    pub language: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VersionRequest {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub contents: Vec<ContentRequest>,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub signature_level: Option<SignatureLevelParam>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
}

impl VersionRequest {
    fn into_input(self) -> ApplicationResult<VersionInput> {
        Ok(VersionInput {
            tags: self.tags,
            contents: self
                .contents
                .into_iter()
                .map(|content| ContentCommand {
                    language: content.language,
                    title: content.title,
                    description: content.description,
                    body: content.body,
                })
                .collect(),
            submitted: self.submitted,
            signature_level: self
                .signature_level
                .map(SignatureLevelParam::into_ref)
                .transpose()?,
            released_at: self.released_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(flatten)]
    pub version: VersionRequest,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddVersionRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Replaces the category bindings when present.
    #[serde(default)]
    pub categories: Option<Vec<i64>>,
    #[serde(flatten)]
    pub version: VersionRequest,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReleaseRequest {
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    #[serde(default)]
    pub version: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmitRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignatureRequest {
    #[serde(default)]
    pub signature_level: Option<SignatureLevelParam>,
    #[serde(default)]
    pub signer_id: Option<i64>,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

fn parse_stage(value: Option<String>) -> ApplicationResult<Option<Stage>> {
    Ok(value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<Stage>)
        .transpose()?)
}

fn parse_ids(value: Option<String>, field: &str) -> ApplicationResult<Vec<i64>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.parse::<i64>().map_err(|_| {
                DomainError::Validation(format!("{field} must be comma separated integers")).into()
            })
        })
        .collect()
}

fn list_query(params: ArticleListParams) -> ApplicationResult<ListArticlesQuery> {
    Ok(ListArticlesQuery {
        ids: parse_ids(params.ids, "ids")?,
        stage: parse_stage(params.stage)?,
        version: params.version,
        language: params.language,
        categories: parse_ids(params.categories, "categories")?,
        search: params.q,
        limit: params.limit,
        offset: params.offset,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(ArticleListParams),
    responses(
        (status = 200, description = "Articles at the selected stage.", body = ArticleListResponse),
        (status = 400, description = "Invalid filter.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn list_articles(
    Extension(state): Extension<HttpState>,
    Query(params): Query<ArticleListParams>,
) -> HttpResult<Json<ArticleListResponse>> {
    let query = list_query(params).into_http()?;
    let items = state
        .services
        .article_queries
        .find_all(query)
        .await
        .into_http()?;
    Ok(Json(ArticleListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = i64, Path, description = "Article id"), ArticleLookupParams),
    responses(
        (status = 200, description = "The article at the selected version.", body = ArticleDto),
        (status = 404, description = "No such article or version.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn get_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Query(params): Query<ArticleLookupParams>,
) -> HttpResult<Json<ArticleDto>> {
    let query = FindArticleQuery {
        id,
        language: params.language,
        stage: parse_stage(params.stage).into_http()?,
        version: params.version,
    };
    state
        .services
        .article_queries
        .find_by_id(query, None)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = CreateArticleRequest,
    responses((status = 200, description = "Created article at version 1.", body = ArticleDto)),
    tag = "Articles"
)]
pub async fn create_article(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<CreateArticleRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = CreateArticleCommand {
        user_id: payload.user_id,
        categories: payload.categories,
        input: payload.version.into_input().into_http()?,
    };

    state
        .services
        .article_commands
        .create(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/versions",
    params(("id" = i64, Path, description = "Article id")),
    request_body = AddVersionRequest,
    responses((status = 200, description = "The new version.", body = ArticleDto)),
    tag = "Articles"
)]
pub async fn add_version(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddVersionRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = AddVersionCommand {
        id,
        user_id: payload.user_id,
        categories: payload.categories,
        input: payload.version.into_input().into_http()?,
    };

    state
        .services
        .article_commands
        .add_version(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses((status = 200, description = "Article archived.", body = StatusResponse)),
    tag = "Articles"
)]
pub async fn archive_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .article_commands
        .archive(ArchiveArticleCommand { id })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "archived".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}/versions/{version}",
    params(
        ("id" = i64, Path, description = "Article id"),
        ("version" = i32, Path, description = "Version number")
    ),
    responses((status = 200, description = "Version deleted.", body = StatusResponse)),
    tag = "Articles"
)]
pub async fn delete_version(
    Extension(state): Extension<HttpState>,
    Path((id, version)): Path<(i64, i32)>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .article_commands
        .delete_version(DeleteVersionCommand { id, version })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "deleted".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/release",
    params(("id" = i64, Path, description = "Article id")),
    request_body = ReleaseRequest,
    responses((status = 200, description = "Released or scheduled version.", body = ArticleDto)),
    tag = "Workflow"
)]
pub async fn release_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReleaseRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = ReleaseArticleCommand {
        id,
        version: payload.version,
        released_at: payload.released_at,
        user_id: payload.user_id,
    };

    state
        .services
        .article_commands
        .release(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/withdraw",
    params(("id" = i64, Path, description = "Article id")),
    request_body = WithdrawRequest,
    responses((status = 200, description = "Withdrawn version.", body = ArticleDto)),
    tag = "Workflow"
)]
pub async fn withdraw_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Json(payload): Json<WithdrawRequest>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .withdraw(WithdrawArticleCommand {
            id,
            version: payload.version,
        })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/submit",
    params(("id" = i64, Path, description = "Article id")),
    request_body = SubmitRequest,
    responses((status = 200, description = "Version under review.", body = ArticleDto)),
    tag = "Workflow"
)]
pub async fn submit_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
    Json(payload): Json<SubmitRequest>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .submit(SubmitArticleCommand {
            id,
            user_id: payload.user_id,
        })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/put-back",
    params(("id" = i64, Path, description = "Article id")),
    responses((status = 200, description = "Version returned to draft.", body = ArticleDto)),
    tag = "Workflow"
)]
pub async fn put_back_article(
    Extension(state): Extension<HttpState>,
    Path(id): Path<i64>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .put_back(PutBackCommand { id })
        .await
        .into_http()
        .map(Json)
}

fn signature_command(
    id: i64,
    version: i32,
    payload: SignatureRequest,
) -> ApplicationResult<SignatureCommand> {
    Ok(SignatureCommand {
        id,
        version,
        signature_level: payload
            .signature_level
            .map(SignatureLevelParam::into_ref)
            .transpose()?,
        signer_id: payload.signer_id,
        reject_reason: payload.reject_reason,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/versions/{version}/approve",
    params(
        ("id" = i64, Path, description = "Article id"),
        ("version" = i32, Path, description = "Version number")
    ),
    request_body = SignatureRequest,
    responses(
        (status = 200, description = "Signed version.", body = ArticleDto),
        (status = 409, description = "Already signed or out of order.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Workflow"
)]
pub async fn approve_version(
    Extension(state): Extension<HttpState>,
    Path((id, version)): Path<(i64, i32)>,
    Json(payload): Json<SignatureRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = signature_command(id, version, payload).into_http()?;
    let mut hints = StageHints::new();
    state
        .services
        .article_commands
        .approve_version(command, &mut hints)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/versions/{version}/reject",
    params(
        ("id" = i64, Path, description = "Article id"),
        ("version" = i32, Path, description = "Version number")
    ),
    request_body = SignatureRequest,
    responses((status = 200, description = "Rejected version.", body = ArticleDto)),
    tag = "Workflow"
)]
pub async fn reject_version(
    Extension(state): Extension<HttpState>,
    Path((id, version)): Path<(i64, i32)>,
    Json(payload): Json<SignatureRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = signature_command(id, version, payload).into_http()?;
    let mut hints = StageHints::new();
    state
        .services
        .article_commands
        .reject_version(command, &mut hints)
        .await
        .into_http()
        .map(Json)
}
