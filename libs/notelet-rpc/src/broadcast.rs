use std::collections::HashMap;

use notelet_core::trace;
use tokio::sync::{broadcast::Sender, RwLock};

use super::protocol::RoomMessage;

/// Fan-out channel of one page room.
pub type Room = Sender<RoomMessage>;

/// All live rooms, keyed by page id.
pub type RoomChannels = RwLock<HashMap<String, Room>>;

pub(crate) fn emit(room: &Room, message: RoomMessage) {
    // send only fails when nobody is subscribed
    if room.send(message).is_err() {
        trace!("room frame dropped: no subscribers");
    }
}
