use axum::extract::ws::{Message as WebSocketMessage, WebSocket};
use futures::{sink::SinkExt, stream::StreamExt};
use notelet_core::{error, info, trace};
use tokio::sync::mpsc::{channel, Receiver, Sender};

use super::super::Message;

impl From<Message> for WebSocketMessage {
    fn from(value: Message) -> Self {
        match value {
            Message::Text(data) => WebSocketMessage::Text(data),
            Message::Close => WebSocketMessage::Close(None),
            Message::Ping => WebSocketMessage::Ping(vec![]),
        }
    }
}

/// Bridge an upgraded websocket into the channel pair
/// [`handle_session`](super::super::handle_session) consumes.
pub fn socket_connector(socket: WebSocket, page_id: &str) -> (Sender<Message>, Receiver<String>) {
    let (mut socket_tx, mut socket_rx) = socket.split();

    // send to remote pipeline
    let (local_sender, mut local_receiver) = channel::<Message>(100);
    {
        // socket send thread
        let page_id = page_id.to_owned();
        tokio::spawn(async move {
            while let Some(msg) = local_receiver.recv().await {
                let closing = matches!(msg, Message::Close);
                if let Err(e) = socket_tx.send(msg.into()).await {
                    error!("socket send error: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
            info!("socket send final: {}", page_id);
        });
    }

    let (remote_sender, remote_receiver) = channel::<String>(512);
    {
        // socket recv thread
        let page_id = page_id.to_owned();
        tokio::spawn(async move {
            while let Some(msg) = socket_rx.next().await {
                if let Ok(WebSocketMessage::Text(text)) = msg {
                    trace!("recv from remote: {}bytes", text.len());
                    if remote_sender.send(text).await.is_err() {
                        // pipeline was closed
                        break;
                    }
                }
            }
            info!("socket recv final: {}", page_id);
        });
    }

    (local_sender, remote_receiver)
}
