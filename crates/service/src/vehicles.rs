//! Vehicles registered by users. At most one vehicle per user is primary.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{user_vehicle, validate};

use crate::errors::ServiceError;
use crate::views::VehicleView;

#[derive(Debug, Default, Deserialize)]
pub struct VehicleInput {
    pub user_id: Option<Uuid>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub license_plate: Option<String>,
    pub is_primary: Option<bool>,
}

fn plate(raw: Option<&str>) -> Result<Option<String>, ServiceError> {
    match validate::optional_text(raw) {
        Some(p) => Ok(Some(user_vehicle::normalize_plate(&p)?)),
        None => Ok(None),
    }
}

fn short_text(field: &str, raw: Option<&str>) -> Result<String, ServiceError> {
    let v = validate::required_text(field, raw)?;
    validate::max_len(field, &v, 64)?;
    Ok(v)
}

async fn clear_primary<C: ConnectionTrait>(db: &C, user_id: Uuid, except: Uuid) -> Result<(), ServiceError> {
    user_vehicle::Entity::update_many()
        .col_expr(user_vehicle::Column::IsPrimary, Expr::value(false))
        .filter(user_vehicle::Column::UserId.eq(user_id))
        .filter(user_vehicle::Column::Id.ne(except))
        .exec(db)
        .await?;
    Ok(())
}

/// A user's vehicles, primary first then newest.
pub async fn list_vehicles(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<VehicleView>, ServiceError> {
    let rows = user_vehicle::Entity::find()
        .filter(user_vehicle::Column::UserId.eq(user_id))
        .order_by_desc(user_vehicle::Column::IsPrimary)
        .order_by_desc(user_vehicle::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_vehicle(db: &DatabaseConnection, id: Uuid) -> Result<Option<VehicleView>, ServiceError> {
    Ok(user_vehicle::Entity::find_by_id(id).one(db).await?.map(Into::into))
}

/// Register a vehicle. A user's first vehicle becomes primary.
#[instrument(skip(db, input))]
pub async fn create_vehicle(db: &DatabaseConnection, input: VehicleInput) -> Result<VehicleView, ServiceError> {
    let user_id = validate::required("user_id", input.user_id)?;
    let make = short_text("make", input.make.as_deref())?;
    let model = short_text("model", input.model.as_deref())?;
    let year = validate::vehicle_year(validate::required("year", input.year)?)?;
    let license_plate = plate(input.license_plate.as_deref())?;

    let txn = db.begin().await?;
    let has_any = user_vehicle::Entity::find()
        .filter(user_vehicle::Column::UserId.eq(user_id))
        .one(&txn)
        .await?
        .is_some();
    let is_primary = input.is_primary.unwrap_or(!has_any);
    let now = Utc::now();
    let m = user_vehicle::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        make: Set(make),
        model: Set(model),
        year: Set(year),
        color: Set(validate::optional_text(input.color.as_deref())),
        license_plate: Set(license_plate),
        is_primary: Set(is_primary),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    if is_primary {
        clear_primary(&txn, user_id, m.id).await?;
    }
    txn.commit().await?;
    info!(id = %m.id, user_id = %user_id, primary = is_primary, event = "vehicle_created", "created vehicle");
    Ok(m.into())
}

#[instrument(skip(db, input))]
pub async fn update_vehicle(db: &DatabaseConnection, id: Uuid, input: VehicleInput) -> Result<VehicleView, ServiceError> {
    let txn = db.begin().await?;
    let row = user_vehicle::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("vehicle"))?;
    let user_id = row.user_id;
    let mut am: user_vehicle::ActiveModel = row.into();
    if let Some(v) = input.make.as_deref() { am.make = Set(short_text("make", Some(v))?); }
    if let Some(v) = input.model.as_deref() { am.model = Set(short_text("model", Some(v))?); }
    if let Some(y) = input.year { am.year = Set(validate::vehicle_year(y)?); }
    if let Some(v) = input.color.as_deref() { am.color = Set(validate::optional_text(Some(v))); }
    if let Some(v) = input.license_plate.as_deref() { am.license_plate = Set(plate(Some(v))?); }
    if let Some(p) = input.is_primary { am.is_primary = Set(p); }
    am.updated_at = Set(Utc::now().into());
    let m = am.update(&txn).await?;
    if input.is_primary == Some(true) {
        clear_primary(&txn, user_id, m.id).await?;
    }
    txn.commit().await?;
    info!(id = %m.id, event = "vehicle_updated", "updated vehicle");
    Ok(m.into())
}

pub async fn delete_vehicle(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = user_vehicle::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn car(user: Uuid, make: &str, year: i32) -> VehicleInput {
        VehicleInput {
            user_id: Some(user),
            make: Some(make.into()),
            model: Some("Corolla".into()),
            year: Some(year),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_vehicle_is_primary_and_primary_moves() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let user = Uuid::new_v4();

        let first = create_vehicle(&db, car(user, "Toyota", 2015)).await?;
        assert!(first.is_primary);
        let second = create_vehicle(&db, VehicleInput { license_plate: Some(" lag-123xy ".into()), ..car(user, "Honda", 2019) }).await?;
        assert!(!second.is_primary);
        assert_eq!(second.license_plate.as_deref(), Some("LAG-123XY"));

        update_vehicle(&db, second.id, VehicleInput { is_primary: Some(true), ..Default::default() }).await?;
        let list = list_vehicles(&db, user).await?;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert!(list[0].is_primary);
        assert!(!list[1].is_primary);

        assert!(list_vehicles(&db, Uuid::new_v4()).await?.is_empty());
        assert!(delete_vehicle(&db, first.id).await?);
        assert!(get_vehicle(&db, first.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn vehicle_validation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let user = Uuid::new_v4();
        let no_year = create_vehicle(&db, VehicleInput { year: None, ..car(user, "Kia", 2020) }).await;
        assert!(matches!(no_year, Err(ServiceError::Validation(ref m)) if m == "year is required"));
        let ancient = create_vehicle(&db, car(user, "Benz", 1850)).await;
        assert!(matches!(ancient, Err(ServiceError::Validation(_))));
        let missing = update_vehicle(&db, Uuid::new_v4(), VehicleInput::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
