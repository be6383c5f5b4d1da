//! Categories and the services (goods / menu items) listed under them.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{cart_item::CartKind, category, service, validate};

use crate::errors::ServiceError;
use crate::views::{CategoryView, ServiceView};

#[derive(Debug, Default, Deserialize)]
pub struct NewCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewService {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ServiceFilter {
    pub category_id: Option<Uuid>,
    pub kind: Option<CartKind>,
}

/// List categories in display order.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryView>, ServiceError> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::SortOrder)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Create a category; duplicate slugs surface as a conflict.
#[instrument(skip(db, input))]
pub async fn create_category(db: &DatabaseConnection, input: NewCategory) -> Result<CategoryView, ServiceError> {
    let name = validate::required_text("name", input.name.as_deref())?;
    let slug = validate::required_text("slug", input.slug.as_deref())?;
    let slug = category::validate_slug(&slug)?;
    let exists = category::Entity::find()
        .filter(category::Column::Slug.eq(slug.clone()))
        .one(db)
        .await?;
    if exists.is_some() {
        return Err(ServiceError::Conflict(format!("category slug '{slug}' already exists")));
    }
    let m = category::create(db, &name, &slug, input.icon.as_deref(), input.sort_order.unwrap_or(0)).await?;
    info!(id = %m.id, slug = %m.slug, event = "category_created", "created category");
    Ok(m.into())
}

/// List services, optionally narrowed by category and kind, ordered by name then price.
pub async fn list_services(db: &DatabaseConnection, filter: ServiceFilter, opts: Pagination) -> Result<Vec<ServiceView>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut q = service::Entity::find();
    if let Some(cid) = filter.category_id {
        q = q.filter(service::Column::CategoryId.eq(cid));
    }
    if let Some(kind) = filter.kind {
        q = q.filter(service::Column::Kind.eq(kind.as_str()));
    }
    let rows = q
        .order_by_asc(service::Column::Name)
        .order_by_asc(service::Column::PriceCents)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Get a service by id.
pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<ServiceView>, ServiceError> {
    Ok(service::Entity::find_by_id(id).one(db).await?.map(Into::into))
}

/// Create a service under an optional category/business.
#[instrument(skip(db, input))]
pub async fn create_service(db: &DatabaseConnection, input: NewService) -> Result<ServiceView, ServiceError> {
    let name = validate::required_text("name", input.name.as_deref())?;
    validate::max_len("name", &name, 200)?;
    let price = validate::non_negative_cents("price_cents", validate::required("price_cents", input.price_cents)?)?;
    let kind = match input.kind.as_deref() {
        Some(k) => k.parse::<CartKind>()?,
        None => CartKind::Shop,
    };
    if let Some(cid) = input.category_id {
        if category::Entity::find_by_id(cid).one(db).await?.is_none() {
            return Err(ServiceError::Validation(format!("category {cid} does not exist")));
        }
    }
    let image_url = validate::optional_text(input.image_url.as_deref());
    if let Some(u) = image_url.as_deref() {
        validate::url("image_url", u)?;
    }
    let am = service::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(input.category_id),
        business_id: Set(input.business_id),
        name: Set(name),
        description: Set(validate::optional_text(input.description.as_deref())),
        price_cents: Set(price),
        image_url: Set(image_url),
        kind: Set(kind.as_str().to_string()),
        created_at: Set(Utc::now().into()),
    };
    let m = am.insert(db).await?;
    info!(id = %m.id, kind = %m.kind, event = "service_created", "created service");
    Ok(m.into())
}
