//! Create `user_vehicle` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserVehicle::Table)
                    .if_not_exists()
                    .col(uuid(UserVehicle::Id).primary_key())
                    .col(uuid(UserVehicle::UserId))
                    .col(string_len(UserVehicle::Make, 64))
                    .col(string_len(UserVehicle::Model, 64))
                    .col(integer(UserVehicle::Year))
                    .col(string_len_null(UserVehicle::Color, 32))
                    .col(string_len_null(UserVehicle::LicensePlate, 16))
                    .col(boolean(UserVehicle::IsPrimary).default(false))
                    .col(timestamp_with_time_zone(UserVehicle::CreatedAt))
                    .col(timestamp_with_time_zone(UserVehicle::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserVehicle::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum UserVehicle {
    Table,
    Id,
    UserId,
    Make,
    Model,
    Year,
    Color,
    LicensePlate,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}
