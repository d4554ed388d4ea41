//! Optimistic per-page edit state with per-block debounced persistence.
//!
//! Every local mutation lands in memory synchronously and is announced
//! to the broadcast hook immediately; the write to the block store is
//! deferred behind a per-block-key timer so rapid keystrokes coalesce
//! into one `update` call carrying the state current at fire time.
//! Edits to distinct blocks schedule independent timers and never
//! cancel each other.

mod tombstones;

pub use tombstones::TombstoneSet;

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use tokio::{
    sync::{mpsc::UnboundedSender, watch, Mutex, RwLock},
    task::JoinHandle,
    time::{sleep_until, Instant},
};

use crate::{
    block::{Block, BlockContent, BlockKind, BlockPatch},
    constants::DEBOUNCE_WINDOW,
    order::{append_after, gap_exhausted, insert_between},
    reconcile::{reconcile, ReconcileOutcome, RemoteUpdate},
    types::{BlockStore, NoteletResult},
};

/// Persistence state surfaced to the UI. `Failed` is a dismissible
/// signal; the optimistic local state is never rolled back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Failed(String),
}

/// Immediate (non-debounced) fan-out payload for a local edit, the
/// shape relayed to other sessions as `block_updated`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockBroadcast {
    pub page_id: String,
    pub block_id: String,
    pub content: BlockContent,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub props: JsonValue,
}

struct BufferState {
    blocks: RwLock<Vec<Block>>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
    tombstones: Mutex<TombstoneSet>,
    focused: Mutex<Option<String>>,
    status: watch::Sender<SaveStatus>,
    broadcast: Mutex<Option<UnboundedSender<BlockBroadcast>>>,
}

pub struct EditBuffer<S> {
    owner: String,
    page_id: String,
    store: Arc<S>,
    state: Arc<BufferState>,
}

impl<S> Clone for EditBuffer<S> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            page_id: self.page_id.clone(),
            store: self.store.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S> EditBuffer<S>
where
    S: BlockStore + 'static,
{
    pub fn new(store: Arc<S>, owner: impl Into<String>, page_id: impl Into<String>) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            owner: owner.into(),
            page_id: page_id.into(),
            store,
            state: Arc::new(BufferState {
                blocks: RwLock::new(Vec::new()),
                timers: Mutex::new(HashMap::new()),
                tombstones: Mutex::new(TombstoneSet::default()),
                focused: Mutex::new(None),
                status,
                broadcast: Mutex::new(None),
            }),
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.state.status.subscribe()
    }

    /// Hook receiving every local edit the instant it is applied.
    pub async fn set_broadcast(&self, tx: UnboundedSender<BlockBroadcast>) {
        *self.state.broadcast.lock().await = Some(tx);
    }

    /// Replace local state with the authoritative record.
    pub async fn load(&self) -> NoteletResult {
        let blocks = self.store.list(&self.owner, &self.page_id).await?;
        *self.state.blocks.write().await = blocks;
        Ok(())
    }

    pub async fn blocks(&self) -> Vec<Block> {
        self.state.blocks.read().await.clone()
    }

    pub async fn block(&self, block_id: &str) -> Option<Block> {
        self.state
            .blocks
            .read()
            .await
            .iter()
            .find(|block| block.id == block_id)
            .cloned()
    }

    pub async fn set_focus(&self, block_id: Option<&str>) {
        *self.state.focused.lock().await = block_id.map(Into::into);
    }

    pub async fn focused(&self) -> Option<String> {
        self.state.focused.lock().await.clone()
    }

    /// Local mutation: apply optimistically, announce immediately,
    /// (re)arm this block's debounce timer.
    pub async fn update_block(&self, block_id: &str, patch: BlockPatch) {
        if self.state.tombstones.lock().await.contains(block_id) {
            debug!("dropping update for tombstoned block {}", block_id);
            return;
        }

        let snapshot = {
            let mut blocks = self.state.blocks.write().await;
            let Some(block) = blocks.iter_mut().find(|block| block.id == block_id) else {
                return;
            };
            patch.apply(block);
            block.clone()
        };

        self.emit_broadcast(&snapshot).await;
        self.arm_timer(block_id.to_owned()).await;
    }

    /// Merge an incoming remote `block_updated` event; never persists
    /// and never arms a timer.
    pub async fn apply_remote(&self, update: &RemoteUpdate) -> ReconcileOutcome {
        let mut blocks = self.state.blocks.write().await;
        let mut tombstones = self.state.tombstones.lock().await;
        let focused = self.state.focused.lock().await;
        reconcile(&mut blocks, &mut tombstones, focused.as_deref(), update)
    }

    /// Insert a new empty block after `prev_id` (or at the tail when
    /// there is no reference sibling), with a fresh fractional key.
    /// When the midpoint gap at the insertion point is numerically
    /// spent, the page is renumbered first.
    pub async fn insert_after(&self, prev_id: Option<&str>, kind: BlockKind) -> NoteletResult<Block> {
        if let (Some(prev), Some(next)) = self.neighbor_orders(prev_id).await {
            if gap_exhausted(prev, next) {
                info!("order keys exhausted on page {}, renumbering", self.page_id);
                let ids: Vec<String> = self.blocks().await.iter().map(|block| block.id.clone()).collect();
                self.reorder(&ids).await?;
            }
        }

        let (position, order) = {
            let blocks = self.state.blocks.read().await;
            match prev_id.and_then(|id| blocks.iter().position(|block| block.id == id)) {
                Some(index) => {
                    let prev = blocks[index].order;
                    let next = blocks.get(index + 1).map(|block| block.order);
                    (index + 1, insert_between(Some(prev), next))
                }
                None => (blocks.len(), append_after(blocks.last().map(|block| block.order))),
            }
        };

        let block = self
            .store
            .create(&self.owner, &self.page_id, kind, BlockContent::default(), order, json!({}))
            .await?;

        let mut blocks = self.state.blocks.write().await;
        let position = position.min(blocks.len());
        blocks.insert(position, block.clone());
        Ok(block)
    }

    /// Delete terminally: cancel the pending save, tombstone the id,
    /// drop it from local state, then remove from the store. A
    /// NotFound reply means it was already gone; that is not an error.
    pub async fn delete_block(&self, block_id: &str) {
        self.state.tombstones.lock().await.insert(block_id);
        if let Some(timer) = self.state.timers.lock().await.remove(block_id) {
            timer.abort();
        }
        self.state.blocks.write().await.retain(|block| block.id != block_id);

        match self.store.delete(&self.owner, block_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!("block {} already deleted remotely", block_id);
            }
            Err(e) => {
                warn!("failed to delete block {}: {}", block_id, e);
                self.state.status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
    }

    /// Rewrite the page into the given visual sequence with fully
    /// renumbered keys. N independent row writes, no cross-write
    /// atomicity: a crash mid-way leaves a transiently odd but still
    /// totally-orderable page.
    pub async fn reorder(&self, ordered_ids: &[String]) -> NoteletResult {
        let reordered = {
            let mut blocks = self.state.blocks.write().await;
            let mut by_id: HashMap<String, Block> =
                blocks.drain(..).map(|block| (block.id.clone(), block)).collect();

            let mut sequence: Vec<Block> = ordered_ids.iter().filter_map(|id| by_id.remove(id)).collect();
            // blocks the caller didn't mention keep their relative tail position
            let mut leftovers: Vec<Block> = by_id.into_values().collect();
            leftovers.sort_by(|a, b| a.order.total_cmp(&b.order));
            sequence.append(&mut leftovers);

            let orders: Vec<f64> = crate::order::renumbered(sequence.len()).collect();
            for (block, order) in sequence.iter_mut().zip(orders) {
                block.order = order;
            }
            *blocks = sequence.clone();
            sequence
        };

        for block in &reordered {
            let patch = BlockPatch {
                order: Some(block.order),
                ..Default::default()
            };
            match self.store.update(&self.owner, &block.id, patch).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    debug!("skipping reorder write for deleted block {}", block.id);
                }
                Err(e) => {
                    warn!("reorder write failed for block {}: {}", block.id, e);
                    self.state.status.send_replace(SaveStatus::Failed(e.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Fire any pending save for a block right now (shutdown path).
    pub async fn flush(&self, block_id: &str) {
        if let Some(timer) = self.state.timers.lock().await.remove(block_id) {
            timer.abort();
            self.save_now(block_id).await;
        }
    }

    pub async fn has_pending_save(&self, block_id: &str) -> bool {
        self.state.timers.lock().await.contains_key(block_id)
    }

    /// Dismiss a surfaced save failure.
    pub fn acknowledge_failure(&self) {
        self.state.status.send_replace(SaveStatus::Idle);
    }

    async fn neighbor_orders(&self, prev_id: Option<&str>) -> (Option<f64>, Option<f64>) {
        let blocks = self.state.blocks.read().await;
        match prev_id.and_then(|id| blocks.iter().position(|block| block.id == id)) {
            Some(index) => (
                Some(blocks[index].order),
                blocks.get(index + 1).map(|block| block.order),
            ),
            None => (None, None),
        }
    }

    async fn emit_broadcast(&self, block: &Block) {
        let mut broadcast = self.state.broadcast.lock().await;
        if let Some(tx) = broadcast.as_ref() {
            let message = BlockBroadcast {
                page_id: block.page_id.clone(),
                block_id: block.id.clone(),
                content: block.content.clone(),
                kind: block.kind,
                props: block.props.clone(),
            };
            if tx.send(message).is_err() {
                debug!("broadcast hook for page {} has been closed", self.page_id);
                *broadcast = None;
            }
        }
    }

    /// Arm (or re-arm) this block's debounce timer. The timer reads
    /// the block's current state when it fires, so a write always
    /// reflects the latest edit even though reads never reset it.
    async fn arm_timer(&self, block_id: String) {
        let mut timers = self.state.timers.lock().await;
        if let Some(previous) = timers.remove(&block_id) {
            previous.abort();
        }

        let this = self.clone();
        let id = block_id.clone();
        // fix the deadline at arm time so late task scheduling cannot
        // stretch the quiet window
        let deadline = Instant::now() + DEBOUNCE_WINDOW;
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            this.state.timers.lock().await.remove(&id);
            this.save_now(&id).await;
        });
        timers.insert(block_id, handle);
    }

    async fn save_now(&self, block_id: &str) {
        if self.state.tombstones.lock().await.contains(block_id) {
            return;
        }

        let Some(block) = self.block(block_id).await else {
            return;
        };

        self.state.status.send_replace(SaveStatus::Saving);
        match self
            .store
            .update(&self.owner, block_id, BlockPatch::snapshot(&block))
            .await
        {
            Ok(_) => {
                self.state.status.send_replace(SaveStatus::Idle);
            }
            Err(e) if e.is_not_found() => {
                // deleted server-side or concurrently: stop quietly,
                // no retry, nothing surfaced to the user
                debug!("block {} gone on save, tombstoning", block_id);
                self.state.tombstones.lock().await.insert(block_id);
                self.state.status.send_replace(SaveStatus::Idle);
            }
            Err(e) => {
                warn!("failed to save block {}: {}", block_id, e);
                self.state.status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
    }
}
