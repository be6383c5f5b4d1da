//! Create tag, comment and recommendation tables hanging off `personal_post`.
//! Rows are removed with their post.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250101_000004_create_personal_post::PersonalPost;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn post_fk(name: &str, from_table: impl IntoTableRef, from_col: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from_table, from_col)
        .to(PersonalPost::Table, PersonalPost::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalPostTag::Table)
                    .if_not_exists()
                    .col(uuid(PersonalPostTag::Id).primary_key())
                    .col(uuid(PersonalPostTag::PostId))
                    .col(string_len(PersonalPostTag::Tag, 64))
                    .foreign_key(&mut post_fk("fk_post_tag_post", PersonalPostTag::Table, PersonalPostTag::PostId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PersonalPostComment::Table)
                    .if_not_exists()
                    .col(uuid(PersonalPostComment::Id).primary_key())
                    .col(uuid(PersonalPostComment::PostId))
                    .col(uuid(PersonalPostComment::UserId))
                    .col(text(PersonalPostComment::Body))
                    .col(timestamp_with_time_zone(PersonalPostComment::CreatedAt))
                    .foreign_key(&mut post_fk("fk_post_comment_post", PersonalPostComment::Table, PersonalPostComment::PostId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PersonalPostRecommendation::Table)
                    .if_not_exists()
                    .col(uuid(PersonalPostRecommendation::Id).primary_key())
                    .col(uuid(PersonalPostRecommendation::PostId))
                    .col(uuid(PersonalPostRecommendation::UserId))
                    .col(timestamp_with_time_zone(PersonalPostRecommendation::CreatedAt))
                    .foreign_key(&mut post_fk(
                        "fk_post_recommendation_post",
                        PersonalPostRecommendation::Table,
                        PersonalPostRecommendation::PostId,
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PersonalPostRecommendation::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(PersonalPostComment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(PersonalPostTag::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum PersonalPostTag {
    Table,
    Id,
    PostId,
    Tag,
}

#[derive(DeriveIden)]
pub enum PersonalPostComment {
    Table,
    Id,
    PostId,
    UserId,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum PersonalPostRecommendation {
    Table,
    Id,
    PostId,
    UserId,
    CreatedAt,
}
