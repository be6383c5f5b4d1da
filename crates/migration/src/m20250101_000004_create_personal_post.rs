//! Create `personal_post` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalPost::Table)
                    .if_not_exists()
                    .col(uuid(PersonalPost::Id).primary_key())
                    .col(uuid(PersonalPost::UserId))
                    .col(text(PersonalPost::Content))
                    .col(string_len_null(PersonalPost::MediaUrl, 1024))
                    .col(string_len_null(PersonalPost::Location, 256))
                    .col(timestamp_with_time_zone(PersonalPost::CreatedAt))
                    .col(timestamp_with_time_zone(PersonalPost::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PersonalPost::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum PersonalPost {
    Table,
    Id,
    UserId,
    Content,
    MediaUrl,
    Location,
    CreatedAt,
    UpdatedAt,
}
