// src/presentation/http/controllers/signature_levels.rs
use crate::application::dto::SignatureLevelDto;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::openapi::SignatureLevelsResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};

#[utoipa::path(
    post,
    path = "/api/v1/signature-levels/refresh",
    responses((status = 200, description = "Reloaded approval chain.", body = SignatureLevelsResponse)),
    tag = "Workflow"
)]
pub async fn refresh_signature_levels(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<SignatureLevelsResponse>> {
    let levels = state
        .services
        .article_commands
        .refresh_signature_levels()
        .await
        .into_http()?;

    Ok(Json(SignatureLevelsResponse {
        levels: SignatureLevelDto::list(&levels),
    }))
}
