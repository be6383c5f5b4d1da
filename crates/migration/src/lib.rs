//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_category;
mod m20250101_000002_create_business_profile;
mod m20250101_000003_create_service;
mod m20250101_000004_create_personal_post;
mod m20250101_000005_create_personal_post_children;
mod m20250101_000006_create_user_vehicle;
mod m20250101_000007_create_skillset_profile;
mod m20250101_000008_create_cart_item;
mod m20250101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_category::Migration),
            Box::new(m20250101_000002_create_business_profile::Migration),
            Box::new(m20250101_000003_create_service::Migration),
            Box::new(m20250101_000004_create_personal_post::Migration),
            Box::new(m20250101_000005_create_personal_post_children::Migration),
            Box::new(m20250101_000006_create_user_vehicle::Migration),
            Box::new(m20250101_000007_create_skillset_profile::Migration),
            Box::new(m20250101_000008_create_cart_item::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000009_add_indexes::Migration),
        ]
    }
}
