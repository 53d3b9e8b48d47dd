use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202410140001_create_test_groups::Migration),
            Box::new(migrations::m202410140002_create_test_blocks::Migration),
        ]
    }
}
