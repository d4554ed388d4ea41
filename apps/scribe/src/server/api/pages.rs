use std::sync::Arc;

use axum::{
    extract::{Json, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension,
};
use notelet_logger::info;
use serde::Deserialize;

use super::{error_response, principal, Context};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    title: String,
    #[serde(default)]
    parent_id: Option<String>,
}

#[utoipa::path(
    post,
    tag = "Pages",
    context_path = "/api",
    path = "/pages",
    request_body(content = String, description = "json", content_type = "application/json"),
    responses(
        (status = 200, description = "Page created"),
        (status = 404, description = "Parent page not found"),
    )
)]
pub async fn create_page(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Json(payload): Json<CreatePage>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("create_page: {} by {}", payload.title, owner);

    match context
        .storage
        .pages()
        .create(owner, &payload.title, payload.parent_id.as_deref())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    tag = "Pages",
    context_path = "/api",
    path = "/pages/{page}",
    params(("page", description = "page id")),
    responses(
        (status = 200, description = "Get page"),
        (status = 404, description = "Page not found"),
    )
)]
pub async fn get_page(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(page): Path<String>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("get_page: {} by {}", page, owner);

    match context.storage.pages().get(owner, &page).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    tag = "Pages",
    context_path = "/api",
    path = "/pages/{page}",
    params(("page", description = "page id")),
    responses(
        (status = 204, description = "Page and descendants deleted"),
        (status = 404, description = "Page not found"),
    )
)]
pub async fn delete_page(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(page): Path<String>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("delete_page: {} by {}", page, owner);

    match context.storage.pages().delete(owner, &page).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
