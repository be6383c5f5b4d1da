//! Create `skillset_profile` table.
//! One profile per user; skills and portfolio are JSON string arrays.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SkillsetProfile::Table)
                    .if_not_exists()
                    .col(uuid(SkillsetProfile::Id).primary_key())
                    .col(uuid(SkillsetProfile::UserId))
                    .col(string_len(SkillsetProfile::FullName, 128))
                    .col(string_len_null(SkillsetProfile::Headline, 256))
                    .col(text_null(SkillsetProfile::Bio))
                    .col(json(SkillsetProfile::Skills))
                    .col(json(SkillsetProfile::PortfolioUrls))
                    .col(big_integer_null(SkillsetProfile::HourlyRateCents))
                    .col(string_len_null(SkillsetProfile::Location, 256))
                    .col(string_len_null(SkillsetProfile::AvatarUrl, 1024))
                    .col(double(SkillsetProfile::Rating).default(0.0))
                    .col(integer(SkillsetProfile::ReviewCount).default(0))
                    .col(timestamp_with_time_zone(SkillsetProfile::CreatedAt))
                    .col(timestamp_with_time_zone(SkillsetProfile::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_skillset_profile_user_unique")
                    .table(SkillsetProfile::Table)
                    .col(SkillsetProfile::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SkillsetProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum SkillsetProfile {
    Table,
    Id,
    UserId,
    FullName,
    Headline,
    Bio,
    Skills,
    PortfolioUrls,
    HourlyRateCents,
    Location,
    AvatarUrl,
    Rating,
    ReviewCount,
    CreatedAt,
    UpdatedAt,
}
