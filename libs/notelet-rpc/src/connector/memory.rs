use tokio::sync::mpsc::{channel, Receiver, Sender};

use super::super::Message;

/// In-process stand-in for a websocket. The first tuple is the pair
/// handed to `handle_session`; the second is the client's end, with
/// frames as raw JSON strings.
pub fn memory_connector() -> ((Sender<Message>, Receiver<String>), (Sender<String>, Receiver<Message>)) {
    let (local_sender, local_receiver) = channel::<Message>(100);
    let (remote_sender, remote_receiver) = channel::<String>(512);

    ((local_sender, remote_receiver), (remote_sender, local_receiver))
}
