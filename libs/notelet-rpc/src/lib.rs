mod broadcast;
mod connector;
mod context;
mod protocol;

pub use broadcast::{Room, RoomChannels};
pub use connector::memory_connector;
#[cfg(feature = "websocket")]
pub use connector::socket_connector;
pub use context::SyncContextImpl;
pub use protocol::{ClientMessage, RoomMessage};

use std::sync::Arc;

use broadcast::emit;
use notelet_core::{debug, error, info, warn};
use tokio::{
    sync::mpsc::{Receiver, Sender},
    time::{sleep, Duration},
};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum Message {
    Text(String),
    Close,
    Ping,
}

/// Drive one editor session against its page room: relay frames from
/// other sessions out, and fan the session's own frames in. A clean
/// leave announces `user_left`; a dropped pipeline does not, the
/// session just disappears.
pub async fn handle_session(
    context: Arc<impl SyncContextImpl + Send + Sync + 'static>,
    page_id: String,
    session_id: String,
    get_channel: impl FnOnce() -> (Sender<Message>, Receiver<String>),
) {
    info!("{} collaborates on page {}", session_id, page_id);

    let (tx, mut rx) = get_channel();

    let room = context.join_room(&page_id).await;
    let mut room_rx = room.subscribe();
    let mut announced = false;

    'sync: loop {
        tokio::select! {
            Ok(message) = room_rx.recv() => {
                // never echo a session's own frames back at it
                if message.source() == session_id {
                    continue 'sync;
                }
                match serde_json::to_string(&message) {
                    Ok(json) => {
                        if tx.send(Message::Text(json)).await.is_err() {
                            // pipeline was closed
                            break 'sync;
                        }
                    }
                    Err(e) => error!("failed to encode room frame: {}", e),
                }
            },
            inbound = rx.recv() => {
                let Some(text) = inbound else {
                    // pipeline dropped without a leave, stay silent
                    break 'sync;
                };
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::JoinRoom { user, .. }) => {
                        if !announced {
                            announced = true;
                            emit(&room, RoomMessage::UserJoined {
                                session_id: session_id.clone(),
                                user,
                            });
                        }
                    }
                    Ok(ClientMessage::LeaveRoom { .. }) => {
                        emit(&room, RoomMessage::UserLeft {
                            session_id: session_id.clone(),
                        });
                        break 'sync;
                    }
                    Ok(ClientMessage::UpdateBlock { block_id, content, kind, props, .. }) => {
                        emit(&room, RoomMessage::BlockUpdated {
                            block_id,
                            content,
                            kind,
                            props,
                            source_session_id: session_id.clone(),
                        });
                    }
                    Err(e) => warn!("unreadable frame from {}: {}", session_id, e),
                }
            },
            _ = sleep(KEEPALIVE_INTERVAL) => {
                if tx.is_closed() || tx.send(Message::Ping).await.is_err() {
                    break 'sync;
                }
            }
        }
    }

    if tx.send(Message::Close).await.is_err() {
        debug!("{} already hung up", session_id);
    }
    drop(room_rx);
    context.leave_room(&page_id).await;
    info!("{} stops collaborating on page {}", session_id, page_id);
}
