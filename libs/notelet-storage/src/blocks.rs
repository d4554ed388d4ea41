use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use nanoid::nanoid;
use notelet_core::{renumbered, Block, BlockContent, BlockKind, BlockPatch, BlockStore, NoteletResult};
use notelet_logger::{info, warn};
use sea_orm::{prelude::*, sea_query::Expr, ColumnTrait, QueryOrder, Set};
use serde_json::Value as JsonValue;

use super::{
    entities::{blocks, prelude::*},
    pages::PageDBStorage,
    types::{NoteletStorageError, NoteletStorageResult},
};

type BlocksColumn = <Blocks as EntityTrait>::Column;

fn block_from_model(model: blocks::Model) -> NoteletStorageResult<Block> {
    let kind = BlockKind::from_str(&model.kind)
        .map_err(|_| NoteletStorageError::Validation(format!("unknown block kind: {}", model.kind)))?;
    let content: BlockContent = serde_json::from_value(model.content)
        .map_err(|e| NoteletStorageError::Validation(format!("malformed block content: {e}")))?;

    Ok(Block {
        id: model.id,
        page_id: model.page_id,
        kind,
        content,
        props: model.props,
        order: model.block_order,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn content_to_json(content: &BlockContent) -> NoteletStorageResult<JsonValue> {
    serde_json::to_value(content)
        .map_err(|e| NoteletStorageError::Validation(format!("unserializable block content: {e}")))
}

/// The authoritative block record. Every operation re-checks page
/// ownership with a fresh lookup; nothing here is cached.
#[derive(Clone)]
pub struct BlockDBStorage {
    pool: DatabaseConnection,
    pages: PageDBStorage,
}

impl BlockDBStorage {
    pub(super) fn new(pool: DatabaseConnection, pages: PageDBStorage) -> Self {
        Self { pool, pages }
    }

    pub async fn list(&self, owner: &str, page_id: &str) -> NoteletStorageResult<Vec<Block>> {
        self.pages.check_owned(owner, page_id).await?;

        Blocks::find()
            .filter(BlocksColumn::PageId.eq(page_id))
            .order_by_asc(BlocksColumn::BlockOrder)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(block_from_model)
            .collect()
    }

    pub async fn create(
        &self,
        owner: &str,
        page_id: &str,
        kind: BlockKind,
        content: BlockContent,
        order: f64,
        props: JsonValue,
    ) -> NoteletStorageResult<Block> {
        self.pages.check_owned(owner, page_id).await?;

        let now = Utc::now();
        let model = blocks::ActiveModel {
            id: Set(nanoid!()),
            page_id: Set(page_id.into()),
            kind: Set(kind.as_str().into()),
            content: Set(content_to_json(&content)?),
            props: Set(props),
            block_order: Set(order),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await?;

        info!("created block {} on page {}", model.id, page_id);
        block_from_model(model)
    }

    pub async fn update(&self, owner: &str, block_id: &str, patch: BlockPatch) -> NoteletStorageResult<Block> {
        let model = self.find_owned(owner, block_id).await?;

        let mut active: blocks::ActiveModel = model.into();
        if let Some(content) = &patch.content {
            active.content = Set(content_to_json(content)?);
        }
        if let Some(kind) = patch.kind {
            active.kind = Set(kind.as_str().into());
        }
        if let Some(props) = patch.props {
            active.props = Set(props);
        }
        if let Some(order) = patch.order {
            active.block_order = Set(order);
        }
        active.updated_at = Set(Utc::now());

        block_from_model(active.update(&self.pool).await?)
    }

    pub async fn delete(&self, owner: &str, block_id: &str) -> NoteletStorageResult {
        self.find_owned(owner, block_id).await?;

        let result = Blocks::delete_by_id(block_id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            // raced with a concurrent delete
            return Err(NoteletStorageError::BlockNotFound(block_id.into()));
        }
        info!("deleted block {}", block_id);
        Ok(())
    }

    /// Rewrite a page into the given visual sequence with fully
    /// renumbered order keys. Blocks the caller leaves out keep their
    /// relative order at the tail and are renumbered with the rest, so
    /// a stale key can never tie with a fresh one. Each sibling is an
    /// independent row write; there is no cross-write atomicity, and an
    /// interrupted reorder leaves all surviving keys comparable.
    pub async fn reorder(&self, owner: &str, page_id: &str, ordered_ids: &[String]) -> NoteletStorageResult<Vec<Block>> {
        self.pages.check_owned(owner, page_id).await?;

        let mut remaining: Vec<String> = Blocks::find()
            .filter(BlocksColumn::PageId.eq(page_id))
            .order_by_asc(BlocksColumn::BlockOrder)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|model| model.id)
            .collect();

        let mut sequence = Vec::with_capacity(remaining.len());
        for block_id in ordered_ids {
            if let Some(index) = remaining.iter().position(|id| id == block_id) {
                sequence.push(remaining.remove(index));
            } else {
                warn!("reorder skipped missing block {} on page {}", block_id, page_id);
            }
        }
        sequence.append(&mut remaining);

        let orders: Vec<f64> = renumbered(sequence.len()).collect();
        for (block_id, order) in sequence.iter().zip(orders) {
            let result = Blocks::update_many()
                .col_expr(BlocksColumn::BlockOrder, Expr::value(order))
                .col_expr(BlocksColumn::UpdatedAt, Expr::value(Utc::now()))
                .filter(BlocksColumn::Id.eq(block_id.as_str()))
                .filter(BlocksColumn::PageId.eq(page_id))
                .exec(&self.pool)
                .await?;
            if result.rows_affected == 0 {
                warn!("reorder raced with delete of block {} on page {}", block_id, page_id);
            }
        }

        self.list(owner, page_id).await
    }

    /// Block lookup plus a fresh ownership check through the owning
    /// page. Both failure modes collapse to NotFound: callers cannot
    /// distinguish "never existed" from "not yours".
    async fn find_owned(&self, owner: &str, block_id: &str) -> NoteletStorageResult<blocks::Model> {
        let model = Blocks::find_by_id(block_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| NoteletStorageError::BlockNotFound(block_id.into()))?;

        self.pages
            .check_owned(owner, &model.page_id)
            .await
            .map_err(|_| NoteletStorageError::BlockNotFound(block_id.into()))?;

        Ok(model)
    }
}

#[async_trait]
impl BlockStore for BlockDBStorage {
    async fn list(&self, owner: &str, page_id: &str) -> NoteletResult<Vec<Block>> {
        Ok(BlockDBStorage::list(self, owner, page_id).await?)
    }

    async fn create(
        &self,
        owner: &str,
        page_id: &str,
        kind: BlockKind,
        content: BlockContent,
        order: f64,
        props: JsonValue,
    ) -> NoteletResult<Block> {
        Ok(BlockDBStorage::create(self, owner, page_id, kind, content, order, props).await?)
    }

    async fn update(&self, owner: &str, block_id: &str, patch: BlockPatch) -> NoteletResult<Block> {
        Ok(BlockDBStorage::update(self, owner, block_id, patch).await?)
    }

    async fn delete(&self, owner: &str, block_id: &str) -> NoteletResult<()> {
        Ok(BlockDBStorage::delete(self, owner, block_id).await?)
    }
}
