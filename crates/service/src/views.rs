//! Wire shapes. Rows are renamed field-for-field into camelCase views; the
//! feed views also carry tag lists and engagement counts.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use models::{
    business_profile, cart_item, category, personal_post, personal_post_comment,
    personal_post_recommendation, service, skillset_profile, user_vehicle,
};

type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

impl From<category::Model> for CategoryView {
    fn from(m: category::Model) -> Self {
        Self { id: m.id, name: m.name, slug: m.slug, icon: m.icon, sort_order: m.sort_order }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub kind: String,
    pub created_at: Timestamp,
}

impl From<service::Model> for ServiceView {
    fn from(m: service::Model) -> Self {
        Self {
            id: m.id,
            category_id: m.category_id,
            business_id: m.business_id,
            name: m.name,
            description: m.description,
            price_cents: m.price_cents,
            image_url: m.image_url,
            kind: m.kind,
            created_at: m.created_at,
        }
    }
}

/// A personal post as shown in the scrolling feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub comment_count: u64,
    pub recommendation_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FeedItem {
    pub fn from_post(m: personal_post::Model, tags: Vec<String>, comment_count: u64, recommendation_count: u64) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            content: m.content,
            media_url: m.media_url,
            location: m.location,
            tags,
            comment_count,
            recommendation_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Feed item ranked by how many users recommended it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPost {
    pub rank: usize,
    #[serde(flatten)]
    pub post: FeedItem,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: Timestamp,
}

impl From<personal_post_comment::Model> for CommentView {
    fn from(m: personal_post_comment::Model) -> Self {
        Self { id: m.id, post_id: m.post_id, user_id: m.user_id, body: m.body, created_at: m.created_at }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: Timestamp,
}

impl From<personal_post_recommendation::Model> for RecommendationView {
    fn from(m: personal_post_recommendation::Model) -> Self {
        Self { id: m.id, post_id: m.post_id, user_id: m.user_id, created_at: m.created_at }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub license_plate: Option<String>,
    pub is_primary: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<user_vehicle::Model> for VehicleView {
    fn from(m: user_vehicle::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            make: m.make,
            model: m.model,
            year: m.year,
            color: m.color,
            license_plate: m.license_plate,
            is_primary: m.is_primary,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfileView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub business_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<business_profile::Model> for BusinessProfileView {
    fn from(m: business_profile::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            business_name: m.business_name,
            category: m.category,
            description: m.description,
            address: m.address,
            phone: m.phone,
            website: m.website,
            logo_url: m.logo_url,
            cover_url: m.cover_url,
            rating: m.rating,
            review_count: m.review_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillsetProfileView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub portfolio_urls: Vec<String>,
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<skillset_profile::Model> for SkillsetProfileView {
    fn from(m: skillset_profile::Model) -> Self {
        let skills = m.skill_list();
        let portfolio_urls = m.portfolio_list();
        Self {
            id: m.id,
            user_id: m.user_id,
            full_name: m.full_name,
            headline: m.headline,
            bio: m.bio,
            skills,
            portfolio_urls,
            hourly_rate_cents: m.hourly_rate_cents,
            location: m.location,
            avatar_url: m.avatar_url,
            rating: m.rating,
            review_count: m.review_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: Uuid,
    pub service_id: Option<Uuid>,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

impl From<cart_item::Model> for CartLineView {
    fn from(m: cart_item::Model) -> Self {
        let line_total_cents = m.line_total_cents();
        Self {
            id: m.id,
            service_id: m.service_id,
            name: m.name,
            unit_price_cents: m.unit_price_cents,
            quantity: m.quantity,
            line_total_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub user_id: Uuid,
    pub kind: cart_item::CartKind,
    pub items: Vec<CartLineView>,
    pub item_count: i64,
    pub subtotal_cents: i64,
}

impl CartView {
    pub fn from_lines(user_id: Uuid, kind: cart_item::CartKind, lines: Vec<cart_item::Model>) -> Self {
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
        let subtotal_cents = lines.iter().map(cart_item::Model::line_total_cents).sum();
        Self { user_id, kind, items: lines.into_iter().map(Into::into).collect(), item_count, subtotal_cents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn feed_item_serializes_camel_case() {
        let now = Utc::now().fixed_offset();
        let post = personal_post::Model {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            content: "hi".into(),
            media_url: None,
            location: Some("Lagos".into()),
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(FeedItem::from_post(post, vec!["tag".into()], 2, 5)).unwrap();
        assert_eq!(v["userId"], serde_json::json!(Uuid::nil()));
        assert_eq!(v["commentCount"], 2);
        assert_eq!(v["recommendationCount"], 5);
        assert_eq!(v["tags"], serde_json::json!(["tag"]));
        assert!(v.get("media_url").is_none());
    }

    #[test]
    fn cart_totals_sum_lines() {
        let now = Utc::now().fixed_offset();
        let line = |price: i64, qty: i32| cart_item::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            cart_kind: "food".into(),
            service_id: None,
            name: "x".into(),
            unit_price_cents: price,
            quantity: qty,
            created_at: now,
            updated_at: now,
        };
        let cart = CartView::from_lines(Uuid::nil(), cart_item::CartKind::Food, vec![line(250, 2), line(1000, 1)]);
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.subtotal_cents, 1500);
        assert_eq!(cart.items[0].line_total_cents, 500);
    }
}
