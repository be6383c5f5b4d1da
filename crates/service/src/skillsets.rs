//! Skillset (service-provider) profiles, one per user.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{skillset_profile, validate};

use crate::errors::ServiceError;
use crate::views::SkillsetProfileView;

pub const MAX_SKILLS: usize = 30;
pub const MAX_PORTFOLIO_URLS: usize = 20;

/// Upsert body keyed by `user_id`. Absent fields keep their stored value on
/// update.
#[derive(Debug, Default, Deserialize)]
pub struct SkillsetInput {
    pub user_id: Option<Uuid>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub portfolio_urls: Option<Vec<String>>,
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
}

fn skills_json(raw: &[String]) -> Result<serde_json::Value, ServiceError> {
    let skills = validate::label_list(raw);
    if skills.len() > MAX_SKILLS {
        return Err(ServiceError::Validation(format!("at most {MAX_SKILLS} skills")));
    }
    for s in &skills {
        validate::max_len("skill", s, 64)?;
    }
    Ok(serde_json::json!(skills))
}

fn portfolio_json(raw: &[String]) -> Result<serde_json::Value, ServiceError> {
    let urls = validate::label_list(raw);
    if urls.len() > MAX_PORTFOLIO_URLS {
        return Err(ServiceError::Validation(format!("at most {MAX_PORTFOLIO_URLS} portfolio urls")));
    }
    for u in &urls {
        validate::url("portfolio_urls", u)?;
    }
    Ok(serde_json::json!(urls))
}

fn full_name(raw: Option<&str>) -> Result<String, ServiceError> {
    let name = validate::required_text("full_name", raw)?;
    validate::max_len("full_name", &name, 128)?;
    Ok(name)
}

fn hourly_rate(raw: Option<i64>) -> Result<Option<i64>, ServiceError> {
    raw.map(|c| validate::non_negative_cents("hourly_rate_cents", c)).transpose().map_err(Into::into)
}

fn avatar(raw: Option<&str>) -> Result<Option<String>, ServiceError> {
    let url = validate::optional_text(raw);
    if let Some(u) = url.as_deref() {
        validate::url("avatar_url", u)?;
    }
    Ok(url)
}

/// List profiles best-rated first; `skill` keeps only profiles listing that
/// skill (case-insensitive).
pub async fn list_profiles(db: &DatabaseConnection, skill: Option<&str>) -> Result<Vec<SkillsetProfileView>, ServiceError> {
    let rows = skillset_profile::Entity::find()
        .order_by_desc(skillset_profile::Column::Rating)
        .order_by_asc(skillset_profile::Column::FullName)
        .all(db)
        .await?;
    let wanted = validate::optional_text(skill).map(|s| s.to_lowercase());
    Ok(rows
        .into_iter()
        .filter(|m| match &wanted {
            Some(w) => m.skill_list().iter().any(|s| s.to_lowercase() == *w),
            None => true,
        })
        .map(Into::into)
        .collect())
}

pub async fn get_profile(db: &DatabaseConnection, id: Uuid) -> Result<Option<SkillsetProfileView>, ServiceError> {
    Ok(skillset_profile::Entity::find_by_id(id).one(db).await?.map(Into::into))
}

pub async fn get_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<SkillsetProfileView>, ServiceError> {
    Ok(skillset_profile::Entity::find()
        .filter(skillset_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(Into::into))
}

/// Insert the user's profile or update the existing one. Returns the view and
/// whether a new row was created.
#[instrument(skip(db, input))]
pub async fn upsert_profile(db: &DatabaseConnection, input: SkillsetInput) -> Result<(SkillsetProfileView, bool), ServiceError> {
    let user_id = validate::required("user_id", input.user_id)?;
    let now = Utc::now();
    let existing = skillset_profile::Entity::find()
        .filter(skillset_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut am: skillset_profile::ActiveModel = row.into();
            if let Some(n) = input.full_name.as_deref() {
                am.full_name = Set(full_name(Some(n))?);
            }
            if let Some(v) = input.headline.as_deref() { am.headline = Set(validate::optional_text(Some(v))); }
            if let Some(v) = input.bio.as_deref() { am.bio = Set(validate::optional_text(Some(v))); }
            if let Some(v) = input.skills.as_deref() { am.skills = Set(skills_json(v)?); }
            if let Some(v) = input.portfolio_urls.as_deref() { am.portfolio_urls = Set(portfolio_json(v)?); }
            if input.hourly_rate_cents.is_some() { am.hourly_rate_cents = Set(hourly_rate(input.hourly_rate_cents)?); }
            if let Some(v) = input.location.as_deref() { am.location = Set(validate::optional_text(Some(v))); }
            if let Some(v) = input.avatar_url.as_deref() { am.avatar_url = Set(avatar(Some(v))?); }
            if let Some(r) = input.rating { am.rating = Set(validate::rating(r)?); }
            if let Some(n) = input.review_count { am.review_count = Set(n.max(0)); }
            am.updated_at = Set(now.into());
            let m = am.update(db).await?;
            info!(id = %m.id, user_id = %user_id, event = "skillset_profile_updated", "updated skillset profile");
            Ok((m.into(), false))
        }
        None => {
            let full_name = full_name(input.full_name.as_deref())?;
            let am = skillset_profile::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                full_name: Set(full_name),
                headline: Set(validate::optional_text(input.headline.as_deref())),
                bio: Set(validate::optional_text(input.bio.as_deref())),
                skills: Set(skills_json(input.skills.as_deref().unwrap_or_default())?),
                portfolio_urls: Set(portfolio_json(input.portfolio_urls.as_deref().unwrap_or_default())?),
                hourly_rate_cents: Set(hourly_rate(input.hourly_rate_cents)?),
                location: Set(validate::optional_text(input.location.as_deref())),
                avatar_url: Set(avatar(input.avatar_url.as_deref())?),
                rating: Set(validate::rating(input.rating.unwrap_or(0.0))?),
                review_count: Set(input.review_count.unwrap_or(0).max(0)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            let m = am.insert(db).await?;
            info!(id = %m.id, user_id = %user_id, event = "skillset_profile_created", "created skillset profile");
            Ok((m.into(), true))
        }
    }
}

pub async fn delete_profile(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = skillset_profile::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
