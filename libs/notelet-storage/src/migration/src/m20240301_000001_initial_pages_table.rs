use sea_orm_migration::prelude::*;

use super::schema::Pages;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000001_initial_pages_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .col(ColumnDef::new(Pages::Id).string().primary_key())
                    .col(ColumnDef::new(Pages::OwnerId).string().not_null())
                    .col(ColumnDef::new(Pages::ParentId).string())
                    .col(ColumnDef::new(Pages::Title).string().not_null())
                    .col(ColumnDef::new(Pages::Icon).string())
                    .col(ColumnDef::new(Pages::CoverUrl).string())
                    .col(ColumnDef::new(Pages::CoverKey).string())
                    .col(ColumnDef::new(Pages::Archived).boolean().not_null())
                    .col(
                        ColumnDef::new(Pages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pages_owner_parent")
                    .table(Pages::Table)
                    .col(Pages::OwnerId)
                    .col(Pages::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("pages_owner_parent").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await?;
        Ok(())
    }
}
