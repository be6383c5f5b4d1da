//! Secondary indexes for the common lookups: per-user lists, per-post
//! children and the uniqueness rules on tags and recommendations.
use sea_orm_migration::prelude::*;

use crate::m20250101_000003_create_service::Service;
use crate::m20250101_000004_create_personal_post::PersonalPost;
use crate::m20250101_000005_create_personal_post_children::{
    PersonalPostComment, PersonalPostRecommendation, PersonalPostTag,
};
use crate::m20250101_000006_create_user_vehicle::UserVehicle;
use crate::m20250101_000002_create_business_profile::BusinessProfile;
use crate::m20250101_000008_create_cart_item::CartItem;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_personal_post_user_created")
                    .table(PersonalPost::Table)
                    .col(PersonalPost::UserId)
                    .col(PersonalPost::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_tag_unique")
                    .table(PersonalPostTag::Table)
                    .col(PersonalPostTag::PostId)
                    .col(PersonalPostTag::Tag)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_comment_post")
                    .table(PersonalPostComment::Table)
                    .col(PersonalPostComment::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_recommendation_unique")
                    .table(PersonalPostRecommendation::Table)
                    .col(PersonalPostRecommendation::PostId)
                    .col(PersonalPostRecommendation::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_vehicle_user")
                    .table(UserVehicle::Table)
                    .col(UserVehicle::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_business_profile_owner")
                    .table(BusinessProfile::Table)
                    .col(BusinessProfile::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_category")
                    .table(Service::Table)
                    .col(Service::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cart_item_user_kind")
                    .table(CartItem::Table)
                    .col(CartItem::UserId)
                    .col(CartItem::CartKind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_cart_item_user_kind", CartItem::Table.into_table_ref()),
            ("idx_service_category", Service::Table.into_table_ref()),
            ("idx_business_profile_owner", BusinessProfile::Table.into_table_ref()),
            ("idx_user_vehicle_user", UserVehicle::Table.into_table_ref()),
            ("idx_post_recommendation_unique", PersonalPostRecommendation::Table.into_table_ref()),
            ("idx_post_comment_post", PersonalPostComment::Table.into_table_ref()),
            ("idx_post_tag_unique", PersonalPostTag::Table.into_table_ref()),
            ("idx_personal_post_user_created", PersonalPost::Table.into_table_ref()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
