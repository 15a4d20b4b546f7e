use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_roles;
mod m20250301_000003_create_user_data;
mod m20250301_000004_create_documents;
mod m20250301_000005_create_document_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_roles::Migration),
            Box::new(m20250301_000003_create_user_data::Migration),
            Box::new(m20250301_000004_create_documents::Migration),
            Box::new(m20250301_000005_create_document_items::Migration),
        ]
    }
}
