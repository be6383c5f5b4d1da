//! Create `cart_item` table shared by the shop and food carts.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartItem::Table)
                    .if_not_exists()
                    .col(uuid(CartItem::Id).primary_key())
                    .col(uuid(CartItem::UserId))
                    .col(string_len(CartItem::CartKind, 16))
                    .col(uuid_null(CartItem::ServiceId))
                    .col(string_len(CartItem::Name, 200))
                    .col(big_integer(CartItem::UnitPriceCents))
                    .col(integer(CartItem::Quantity))
                    .col(timestamp_with_time_zone(CartItem::CreatedAt))
                    .col(timestamp_with_time_zone(CartItem::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CartItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum CartItem {
    Table,
    Id,
    UserId,
    CartKind,
    ServiceId,
    Name,
    UnitPriceCents,
    Quantity,
    CreatedAt,
    UpdatedAt,
}
