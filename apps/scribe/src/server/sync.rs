use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Path},
    response::Response,
    routing::get,
    Extension, Router,
};
use nanoid::nanoid;
use notelet_logger::info;
use notelet_rpc::{handle_session, socket_connector};

use super::api::Context;

pub fn sync_handler(router: Router) -> Router {
    router.route("/collaboration/:page", get(upgrade_handler))
}

pub async fn upgrade_handler(
    Extension(context): Extension<Arc<Context>>,
    Path(page): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    let session_id = nanoid!();
    info!("upgrade: {} joins {}", session_id, page);
    ws.on_upgrade(move |socket| {
        handle_session(context.clone(), page.clone(), session_id, move || {
            socket_connector(socket, &page)
        })
    })
}
