use std::sync::Arc;

use axum::{
    extract::{Json, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension,
};
use notelet_core::{BlockContent, BlockKind, BlockPatch};
use notelet_logger::info;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use super::{error_response, principal, Context};

#[utoipa::path(
    get,
    tag = "Blocks",
    context_path = "/api",
    path = "/pages/{page}/blocks",
    params(("page", description = "page id")),
    responses(
        (status = 200, description = "Blocks of the page in visual order"),
        (status = 404, description = "Page not found"),
    )
)]
pub async fn get_page_blocks(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(page): Path<String>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("get_page_blocks: {} by {}", page, owner);

    match context.storage.blocks().list(owner, &page).await {
        Ok(blocks) => Json(blocks).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlock {
    page_id: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: BlockContent,
    order: f64,
    #[serde(default = "empty_props")]
    props: JsonValue,
}

fn empty_props() -> JsonValue {
    json!({})
}

#[utoipa::path(
    post,
    tag = "Blocks",
    context_path = "/api",
    path = "/blocks",
    request_body(content = String, description = "json", content_type = "application/json"),
    responses(
        (status = 200, description = "Block created"),
        (status = 404, description = "Page not found"),
    )
)]
pub async fn create_block(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBlock>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("create_block: {} on {} by {}", payload.kind, payload.page_id, owner);

    match context
        .storage
        .blocks()
        .create(
            owner,
            &payload.page_id,
            payload.kind,
            payload.content,
            payload.order,
            payload.props,
        )
        .await
    {
        Ok(block) => Json(block).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    put,
    tag = "Blocks",
    context_path = "/api",
    path = "/blocks/{block}",
    params(("block", description = "block id")),
    request_body(content = String, description = "json", content_type = "application/json"),
    responses(
        (status = 200, description = "Block updated"),
        (status = 404, description = "Block not found"),
    )
)]
pub async fn update_block(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(block): Path<String>,
    Json(patch): Json<BlockPatch>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("update_block: {} by {}", block, owner);

    match context.storage.blocks().update(owner, &block, patch).await {
        Ok(block) => Json(block).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    tag = "Blocks",
    context_path = "/api",
    path = "/blocks/{block}",
    params(("block", description = "block id")),
    responses(
        (status = 204, description = "Block deleted"),
        (status = 404, description = "Block not found"),
    )
)]
pub async fn delete_block(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(block): Path<String>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("delete_block: {} by {}", block, owner);

    match context.storage.blocks().delete(owner, &block).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBlocks {
    block_ids: Vec<String>,
}

#[utoipa::path(
    post,
    tag = "Blocks",
    context_path = "/api",
    path = "/pages/{page}/blocks/reorder",
    params(("page", description = "page id")),
    request_body(content = String, description = "json", content_type = "application/json"),
    responses(
        (status = 200, description = "Blocks renumbered into the given sequence"),
        (status = 404, description = "Page not found"),
    )
)]
pub async fn reorder_blocks(
    Extension(context): Extension<Arc<Context>>,
    headers: HeaderMap,
    Path(page): Path<String>,
    Json(payload): Json<ReorderBlocks>,
) -> impl IntoResponse {
    let owner = match principal(&headers) {
        Ok(owner) => owner,
        Err(status) => return status.into_response(),
    };
    info!("reorder_blocks: {} blocks on {} by {}", payload.block_ids.len(), page, owner);

    match context
        .storage
        .blocks()
        .reorder(owner, &page, &payload.block_ids)
        .await
    {
        Ok(blocks) => Json(blocks).into_response(),
        Err(e) => error_response(e),
    }
}
