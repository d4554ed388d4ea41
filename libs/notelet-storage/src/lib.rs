mod blocks;
mod entities;
mod pages;
#[cfg(test)]
mod tests;
mod types;

pub use blocks::BlockDBStorage;
pub use pages::PageDBStorage;
pub use types::{NoteletStorageError, NoteletStorageResult};

use notelet_logger::info;
use notelet_storage_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

/// Connection pool plus the page and block stores built on it.
/// Migrations run on every init.
pub struct NoteletStorage {
    database: String,
    pages: PageDBStorage,
    blocks: BlockDBStorage,
}

impl NoteletStorage {
    pub async fn new(database: &str) -> NoteletStorageResult<Self> {
        let is_sqlite = database.starts_with("sqlite");

        let mut options = ConnectOptions::new(database.to_owned());
        if is_sqlite {
            // sqlite gets a single writer, everything else a real pool
            options.max_connections(1);
        } else {
            options.max_connections(50);
        }
        let pool = Database::connect(options).await?;
        Migrator::up(&pool, None).await?;

        let pages = PageDBStorage::new(pool.clone());
        let blocks = BlockDBStorage::new(pool.clone(), pages.clone());

        Ok(Self {
            database: database.into(),
            pages,
            blocks,
        })
    }

    pub async fn new_with_sqlite(file: &str) -> NoteletStorageResult<Self> {
        Self::new(&format!("sqlite://{file}.db?mode=rwc")).await
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn pages(&self) -> &PageDBStorage {
        &self.pages
    }

    pub fn blocks(&self) -> &BlockDBStorage {
        &self.blocks
    }

    pub async fn close(&self) {
        info!("closing database {}", self.database);
        // sea-orm pools close on drop; nothing else to flush
    }
}
