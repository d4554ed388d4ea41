mod blocks;
mod pages;

use std::collections::HashMap;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use notelet_logger::{error, info};
use notelet_rpc::{RoomChannels, SyncContextImpl};
use notelet_storage::{NoteletStorage, NoteletStorageError};
use tokio::sync::RwLock;

pub struct Context {
    pub channel: RoomChannels,
    pub storage: NoteletStorage,
}

impl Context {
    pub async fn new(storage: Option<NoteletStorage>) -> Self {
        let storage = if let Some(storage) = storage {
            info!("use external storage instance: {}", storage.database());
            Ok(storage)
        } else if let Ok(database_url) = dotenvy::var("DATABASE_URL") {
            info!("use external database: {}", database_url);
            NoteletStorage::new(&database_url).await
        } else {
            info!("use sqlite database: notelet.db");
            NoteletStorage::new_with_sqlite("notelet").await
        }
        .expect("Cannot create database");

        Context {
            channel: RwLock::new(HashMap::new()),
            storage,
        }
    }
}

impl SyncContextImpl for Context {
    fn get_channel(&self) -> &RoomChannels {
        &self.channel
    }
}

/// The caller's identity, as asserted by the `x-user-id` header. Real
/// authentication lives in front of this service.
pub fn principal(headers: &HeaderMap) -> Result<&str, StatusCode> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .filter(|user| !user.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)
}

pub fn error_response(e: NoteletStorageError) -> Response {
    match e {
        NoteletStorageError::PageNotFound(_) | NoteletStorageError::BlockNotFound(_) => {
            StatusCode::NOT_FOUND.into_response()
        }
        NoteletStorageError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        NoteletStorageError::Db(e) => {
            error!("database failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn api_handler(router: Router) -> Router {
    router.nest(
        "/api",
        Router::new()
            .route("/pages", post(pages::create_page))
            .route("/pages/:page", get(pages::get_page).delete(pages::delete_page))
            .route("/pages/:page/blocks", get(blocks::get_page_blocks))
            .route("/pages/:page/blocks/reorder", post(blocks::reorder_blocks))
            .route("/blocks", post(blocks::create_block))
            .route(
                "/blocks/:block",
                put(blocks::update_block).delete(blocks::delete_block),
            ),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn principal_comes_from_the_user_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(principal(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert("x-user-id", "".parse().unwrap());
        assert_eq!(principal(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert("x-user-id", "u1".parse().unwrap());
        assert_eq!(principal(&headers), Ok("u1"));
    }
}
