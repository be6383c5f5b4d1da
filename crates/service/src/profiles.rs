//! Business profiles.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{business_profile, validate};

use crate::errors::ServiceError;
use crate::views::BusinessProfileView;

/// Create/update body. On update every field is optional and only present
/// fields are written; a blank string clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct BusinessProfileInput {
    pub owner_id: Option<Uuid>,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
}

#[derive(Debug, Default, Clone)]
pub struct ProfileFilter {
    pub owner_id: Option<Uuid>,
    pub category: Option<String>,
}

fn checked_phone(raw: Option<&str>) -> Result<Option<String>, ServiceError> {
    let phone = validate::optional_text(raw);
    if let Some(p) = phone.as_deref() {
        business_profile::validate_phone(p)?;
    }
    Ok(phone)
}

fn checked_url(field: &str, raw: Option<&str>) -> Result<Option<String>, ServiceError> {
    let url = validate::optional_text(raw);
    if let Some(u) = url.as_deref() {
        validate::url(field, u)?;
    }
    Ok(url)
}

fn checked_review_count(n: i32) -> Result<i32, ServiceError> {
    if n < 0 {
        return Err(ServiceError::Validation("review_count must be >= 0".into()));
    }
    Ok(n)
}

pub async fn list_profiles(db: &DatabaseConnection, filter: ProfileFilter) -> Result<Vec<BusinessProfileView>, ServiceError> {
    let mut q = business_profile::Entity::find();
    if let Some(owner) = filter.owner_id {
        q = q.filter(business_profile::Column::OwnerId.eq(owner));
    }
    if let Some(cat) = validate::optional_text(filter.category.as_deref()) {
        q = q.filter(business_profile::Column::Category.eq(cat));
    }
    let rows = q
        .order_by_desc(business_profile::Column::Rating)
        .order_by_asc(business_profile::Column::BusinessName)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_profile(db: &DatabaseConnection, id: Uuid) -> Result<Option<BusinessProfileView>, ServiceError> {
    Ok(business_profile::Entity::find_by_id(id).one(db).await?.map(Into::into))
}

#[instrument(skip(db, input))]
pub async fn create_profile(db: &DatabaseConnection, input: BusinessProfileInput) -> Result<BusinessProfileView, ServiceError> {
    let owner_id = validate::required("owner_id", input.owner_id)?;
    let business_name = validate::required_text("business_name", input.business_name.as_deref())?;
    validate::max_len("business_name", &business_name, 200)?;
    let now = Utc::now();
    let am = business_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        business_name: Set(business_name),
        category: Set(validate::optional_text(input.category.as_deref())),
        description: Set(validate::optional_text(input.description.as_deref())),
        address: Set(validate::optional_text(input.address.as_deref())),
        phone: Set(checked_phone(input.phone.as_deref())?),
        website: Set(checked_url("website", input.website.as_deref())?),
        logo_url: Set(checked_url("logo_url", input.logo_url.as_deref())?),
        cover_url: Set(checked_url("cover_url", input.cover_url.as_deref())?),
        rating: Set(validate::rating(input.rating.unwrap_or(0.0))?),
        review_count: Set(checked_review_count(input.review_count.unwrap_or(0))?),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, owner_id = %m.owner_id, event = "business_profile_created", "created business profile");
    Ok(m.into())
}

#[instrument(skip(db, input))]
pub async fn update_profile(db: &DatabaseConnection, id: Uuid, input: BusinessProfileInput) -> Result<BusinessProfileView, ServiceError> {
    let mut am: business_profile::ActiveModel = business_profile::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("business profile"))?
        .into();
    if let Some(name) = input.business_name.as_deref() {
        let name = validate::required_text("business_name", Some(name))?;
        validate::max_len("business_name", &name, 200)?;
        am.business_name = Set(name);
    }
    if let Some(v) = input.category.as_deref() { am.category = Set(validate::optional_text(Some(v))); }
    if let Some(v) = input.description.as_deref() { am.description = Set(validate::optional_text(Some(v))); }
    if let Some(v) = input.address.as_deref() { am.address = Set(validate::optional_text(Some(v))); }
    if let Some(v) = input.phone.as_deref() { am.phone = Set(checked_phone(Some(v))?); }
    if let Some(v) = input.website.as_deref() { am.website = Set(checked_url("website", Some(v))?); }
    if let Some(v) = input.logo_url.as_deref() { am.logo_url = Set(checked_url("logo_url", Some(v))?); }
    if let Some(v) = input.cover_url.as_deref() { am.cover_url = Set(checked_url("cover_url", Some(v))?); }
    if let Some(r) = input.rating { am.rating = Set(validate::rating(r)?); }
    if let Some(n) = input.review_count { am.review_count = Set(checked_review_count(n)?); }
    am.updated_at = Set(Utc::now().into());
    let m = am.update(db).await?;
    info!(id = %m.id, event = "business_profile_updated", "updated business profile");
    Ok(m.into())
}

pub async fn delete_profile(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = business_profile::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn business_profile_crud() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = Uuid::new_v4();

        let created = create_profile(&db, BusinessProfileInput {
            owner_id: Some(owner),
            business_name: Some("Mama Put".into()),
            category: Some("food".into()),
            phone: Some("+234 801 234 5678".into()),
            website: Some("https://mamaput.example".into()),
            ..Default::default()
        }).await?;
        assert_eq!(created.rating, 0.0);

        let listed = list_profiles(&db, ProfileFilter { owner_id: Some(owner), ..Default::default() }).await?;
        assert_eq!(listed.len(), 1);
        assert!(list_profiles(&db, ProfileFilter { category: Some("autos".into()), ..Default::default() }).await?.is_empty());

        let updated = update_profile(&db, created.id, BusinessProfileInput {
            description: Some("Home-style meals".into()),
            website: Some("".into()),
            rating: Some(4.8),
            ..Default::default()
        }).await?;
        assert_eq!(updated.description.as_deref(), Some("Home-style meals"));
        assert_eq!(updated.website, None);
        assert_eq!(updated.business_name, "Mama Put");
        assert_eq!(updated.rating, 4.8);

        assert!(delete_profile(&db, created.id).await?);
        assert!(get_profile(&db, created.id).await?.is_none());
        let missing = update_profile(&db, created.id, BusinessProfileInput::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn business_profile_validation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let no_name = create_profile(&db, BusinessProfileInput { owner_id: Some(Uuid::new_v4()), ..Default::default() }).await;
        assert!(matches!(no_name, Err(ServiceError::Validation(ref m)) if m == "business_name is required"));
        let bad_rating = create_profile(&db, BusinessProfileInput {
            owner_id: Some(Uuid::new_v4()),
            business_name: Some("x".into()),
            rating: Some(7.0),
            ..Default::default()
        }).await;
        assert!(matches!(bad_rating, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
