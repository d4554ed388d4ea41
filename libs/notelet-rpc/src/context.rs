use std::collections::hash_map::Entry;

use async_trait::async_trait;
use notelet_core::debug;
use tokio::sync::broadcast::channel as broadcast;

use super::broadcast::{Room, RoomChannels};

/// What a server embedding the collaboration loop must provide. The
/// relay holds no storage handle: room traffic is advisory and the
/// block record stays the single source of truth on reload.
#[async_trait]
pub trait SyncContextImpl {
    fn get_channel(&self) -> &RoomChannels;

    /// Get or create the broadcast channel of a page room.
    async fn join_room(&self, page_id: &str) -> Room {
        match self.get_channel().write().await.entry(page_id.into()) {
            Entry::Occupied(tx) => tx.get().clone(),
            Entry::Vacant(v) => {
                debug!("open room {}", page_id);
                let (tx, _) = broadcast(100);
                v.insert(tx.clone());
                tx
            }
        }
    }

    /// Drop the room entry once the last subscriber is gone.
    async fn leave_room(&self, page_id: &str) {
        let mut channel = self.get_channel().write().await;
        if let Some(room) = channel.get(page_id) {
            if room.receiver_count() == 0 {
                channel.remove(page_id);
                debug!("close room {}", page_id);
            }
        }
    }
}
