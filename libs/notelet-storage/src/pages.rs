use chrono::Utc;
use nanoid::nanoid;
use notelet_core::{Cover, Page};
use notelet_logger::info;
use sea_orm::{prelude::*, ColumnTrait, Set, TransactionTrait};

use super::{
    entities::{pages, prelude::*},
    types::{NoteletStorageError, NoteletStorageResult},
};

type PagesColumn = <Pages as EntityTrait>::Column;
type BlocksColumn = <super::entities::prelude::Blocks as EntityTrait>::Column;

fn page_from_model(model: pages::Model) -> Page {
    Page {
        id: model.id,
        owner_id: model.owner_id,
        parent_id: model.parent_id,
        title: model.title,
        icon: model.icon,
        cover: Cover {
            url: model.cover_url,
            key: model.cover_key,
        },
        archived: model.archived,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Page records exist here as the ownership and foreign-key boundary
/// for blocks; tree CRUD beyond create/get/delete lives elsewhere.
#[derive(Clone)]
pub struct PageDBStorage {
    pool: DatabaseConnection,
}

impl PageDBStorage {
    pub(super) fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Fresh ownership lookup, performed on every block mutation. A
    /// page deleted or reassigned mid-session fails the next check.
    pub(super) async fn check_owned(&self, owner: &str, page_id: &str) -> NoteletStorageResult<pages::Model> {
        Pages::find_by_id(page_id)
            .filter(PagesColumn::OwnerId.eq(owner))
            .one(&self.pool)
            .await?
            .ok_or_else(|| NoteletStorageError::PageNotFound(page_id.into()))
    }

    pub async fn create(&self, owner: &str, title: &str, parent_id: Option<&str>) -> NoteletStorageResult<Page> {
        if let Some(parent) = parent_id {
            self.check_owned(owner, parent).await?;
        }

        let now = Utc::now();
        let model = pages::ActiveModel {
            id: Set(nanoid!()),
            owner_id: Set(owner.into()),
            parent_id: Set(parent_id.map(Into::into)),
            title: Set(title.into()),
            icon: Set(None),
            cover_url: Set(None),
            cover_key: Set(None),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await?;

        info!("created page {} for {}", model.id, owner);
        Ok(page_from_model(model))
    }

    pub async fn get(&self, owner: &str, page_id: &str) -> NoteletStorageResult<Page> {
        self.check_owned(owner, page_id).await.map(page_from_model)
    }

    /// Delete a page and, transitively, every descendant page along
    /// with all of their blocks.
    pub async fn delete(&self, owner: &str, page_id: &str) -> NoteletStorageResult {
        self.check_owned(owner, page_id).await?;

        let mut doomed = vec![page_id.to_owned()];
        let mut frontier = vec![page_id.to_owned()];
        while !frontier.is_empty() {
            let children: Vec<String> = Pages::find()
                .filter(PagesColumn::ParentId.is_in(frontier.clone()))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|page| page.id)
                .collect();
            doomed.extend(children.iter().cloned());
            frontier = children;
        }

        let tx = self.pool.begin().await?;
        Blocks::delete_many()
            .filter(BlocksColumn::PageId.is_in(doomed.clone()))
            .exec(&tx)
            .await?;
        Pages::delete_many()
            .filter(PagesColumn::Id.is_in(doomed.clone()))
            .exec(&tx)
            .await?;
        tx.commit().await?;

        info!("deleted page {} and {} descendants", page_id, doomed.len() - 1);
        Ok(())
    }
}
