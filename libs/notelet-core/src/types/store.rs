use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{NoteletError, NoteletResult};
use crate::block::{Block, BlockContent, BlockKind, BlockPatch};

/// Durable block CRUD scoped to a page, with ownership enforced
/// transitively through the page's owner. The authoritative record:
/// live sessions only ever diverge from it until the next reload.
#[async_trait]
pub trait BlockStore<E = NoteletError>: Send + Sync {
    /// Blocks of a page sorted by order key ascending.
    async fn list(&self, owner: &str, page_id: &str) -> NoteletResult<Vec<Block>, E>;

    /// Insert a block with a server-assigned id and timestamps.
    async fn create(
        &self,
        owner: &str,
        page_id: &str,
        kind: BlockKind,
        content: BlockContent,
        order: f64,
        props: JsonValue,
    ) -> NoteletResult<Block, E>;

    /// Merge only the fields present in the patch, re-checking page
    /// ownership on every call.
    async fn update(&self, owner: &str, block_id: &str, patch: BlockPatch) -> NoteletResult<Block, E>;

    /// Permanent removal. A second delete of the same id reports
    /// NotFound, which callers treat as "already gone".
    async fn delete(&self, owner: &str, block_id: &str) -> NoteletResult<(), E>;
}
