//! Create `service` table.
//! Purchasable goods and orderable food items, optionally tied to a category
//! and to the business offering them.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250101_000001_create_category::Category;
use crate::m20250101_000002_create_business_profile::BusinessProfile;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid_null(Service::CategoryId))
                    .col(uuid_null(Service::BusinessId))
                    .col(string_len(Service::Name, 200))
                    .col(text_null(Service::Description))
                    .col(big_integer(Service::PriceCents))
                    .col(string_len_null(Service::ImageUrl, 1024))
                    .col(string_len(Service::Kind, 16))
                    .col(timestamp_with_time_zone(Service::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_category")
                            .from(Service::Table, Service::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_business")
                            .from(Service::Table, Service::BusinessId)
                            .to(BusinessProfile::Table, BusinessProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Service {
    Table,
    Id,
    CategoryId,
    BusinessId,
    Name,
    Description,
    PriceCents,
    ImageUrl,
    Kind,
    CreatedAt,
}
