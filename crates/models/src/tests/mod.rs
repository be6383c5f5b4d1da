//! Entity round trips against an in-memory SQLite database migrated with
//! the real migrator.

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use uuid::Uuid;
use chrono::Utc;

use crate::{category, db, personal_post, personal_post_tag, skillset_profile};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn category_create_validates_and_persists() -> Result<()> {
    let db = setup_test_db().await?;

    let c = category::create(&db, "  Food & Drink ", "Food-Drink", Some("utensils"), 2).await?;
    assert_eq!(c.name, "Food & Drink");
    assert_eq!(c.slug, "food-drink");

    let found = category::Entity::find_by_id(c.id).one(&db).await?;
    assert_eq!(found.map(|m| m.slug), Some("food-drink".to_string()));

    assert!(category::create(&db, "", "x", None, 0).await.is_err());
    assert!(category::create(&db, "Bad", "bad slug", None, 0).await.is_err());
    // slug is unique
    assert!(category::create(&db, "Again", "food-drink", None, 0).await.is_err());
    Ok(())
}

#[tokio::test]
async fn tags_attach_idempotently_and_cascade_with_post() -> Result<()> {
    let db = setup_test_db().await?;
    let now = Utc::now();
    let post = personal_post::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(Uuid::new_v4()),
        content: Set("first post".into()),
        media_url: Set(None),
        location: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    let a = personal_post_tag::attach(&db, post.id, "#Coffee").await?;
    let b = personal_post_tag::attach(&db, post.id, "coffee").await?;
    assert_eq!(a.id, b.id);
    // a second writer racing past the existence check gets the stored row
    let raced = personal_post_tag::insert_or_existing(&db, post.id, "coffee".into()).await?;
    assert_eq!(raced.id, a.id);
    personal_post_tag::attach(&db, post.id, "brunch").await?;

    let tags = personal_post_tag::list_for_post(&db, post.id).await?;
    assert_eq!(tags.iter().map(|t| t.tag.as_str()).collect::<Vec<_>>(), vec!["brunch", "coffee"]);

    let post_id = post.id;
    post.delete(&db).await?;
    assert!(personal_post_tag::list_for_post(&db, post_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn skillset_json_columns_round_trip() -> Result<()> {
    let db = setup_test_db().await?;
    let now = Utc::now();
    let m = skillset_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(Uuid::new_v4()),
        full_name: Set("Ada".into()),
        headline: Set(Some("Electrician".into())),
        bio: Set(None),
        skills: Set(serde_json::json!(["wiring", "solar"])),
        portfolio_urls: Set(serde_json::json!([])),
        hourly_rate_cents: Set(Some(4500)),
        location: Set(None),
        avatar_url: Set(None),
        rating: Set(4.5),
        review_count: Set(3),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    let found = skillset_profile::Entity::find_by_id(m.id).one(&db).await?.expect("row");
    assert_eq!(found.skill_list(), vec!["wiring".to_string(), "solar".to_string()]);
    assert!(found.portfolio_list().is_empty());
    assert_eq!(found.rating, 4.5);
    Ok(())
}
