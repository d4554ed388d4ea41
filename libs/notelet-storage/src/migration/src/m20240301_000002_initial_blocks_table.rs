use sea_orm_migration::prelude::*;

use super::schema::Blocks;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000002_initial_blocks_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blocks::Table)
                    .col(ColumnDef::new(Blocks::Id).string().primary_key())
                    .col(ColumnDef::new(Blocks::PageId).string().not_null())
                    .col(ColumnDef::new(Blocks::Kind).string().not_null())
                    .col(ColumnDef::new(Blocks::Content).json().not_null())
                    .col(ColumnDef::new(Blocks::Props).json().not_null())
                    .col(ColumnDef::new(Blocks::BlockOrder).double().not_null())
                    .col(
                        ColumnDef::new(Blocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Blocks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // blocks of a page are always read in order
        manager
            .create_index(
                Index::create()
                    .name("blocks_page_order")
                    .table(Blocks::Table)
                    .col(Blocks::PageId)
                    .col(Blocks::BlockOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("blocks_page_order").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blocks::Table).to_owned())
            .await?;
        Ok(())
    }
}
