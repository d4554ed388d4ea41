use sea_orm_migration::prelude::*;

#[derive(Iden)]
pub enum Pages {
    Table,
    Id,
    OwnerId,
    ParentId,
    Title,
    Icon,
    CoverUrl,
    CoverKey,
    Archived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Blocks {
    Table,
    Id,
    PageId,
    Kind,
    Content,
    Props,
    BlockOrder,
    CreatedAt,
    UpdatedAt,
}
