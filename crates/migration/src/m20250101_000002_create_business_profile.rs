//! Create `business_profile` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessProfile::Table)
                    .if_not_exists()
                    .col(uuid(BusinessProfile::Id).primary_key())
                    .col(uuid(BusinessProfile::OwnerId))
                    .col(string_len(BusinessProfile::BusinessName, 200))
                    .col(string_len_null(BusinessProfile::Category, 128))
                    .col(text_null(BusinessProfile::Description))
                    .col(string_len_null(BusinessProfile::Address, 512))
                    .col(string_len_null(BusinessProfile::Phone, 32))
                    .col(string_len_null(BusinessProfile::Website, 512))
                    .col(string_len_null(BusinessProfile::LogoUrl, 1024))
                    .col(string_len_null(BusinessProfile::CoverUrl, 1024))
                    .col(double(BusinessProfile::Rating).default(0.0))
                    .col(integer(BusinessProfile::ReviewCount).default(0))
                    .col(timestamp_with_time_zone(BusinessProfile::CreatedAt))
                    .col(timestamp_with_time_zone(BusinessProfile::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BusinessProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum BusinessProfile {
    Table,
    Id,
    OwnerId,
    BusinessName,
    Category,
    Description,
    Address,
    Phone,
    Website,
    LogoUrl,
    CoverUrl,
    Rating,
    ReviewCount,
    CreatedAt,
    UpdatedAt,
}
