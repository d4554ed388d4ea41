pub use sea_orm_migration::prelude::*;

mod m20240301_000001_initial_pages_table;
mod m20240301_000002_initial_blocks_table;
mod schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_initial_pages_table::Migration),
            Box::new(m20240301_000002_initial_blocks_table::Migration),
        ]
    }
}
