//! Shopping and food-ordering carts. Lines are keyed by (user, kind) and,
//! when they reference a catalog service, merged per service.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{cart_item::{self, CartKind}, service, validate};

use crate::errors::ServiceError;
use crate::views::CartView;

#[derive(Debug, Default, Deserialize)]
pub struct AddCartItem {
    pub user_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub name: Option<String>,
    pub unit_price_cents: Option<i64>,
    pub quantity: Option<i32>,
}

/// Load the cart for a user.
pub async fn get_cart(db: &DatabaseConnection, user_id: Uuid, kind: CartKind) -> Result<CartView, ServiceError> {
    let lines = cart_item::Entity::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::CartKind.eq(kind.as_str()))
        .order_by_asc(cart_item::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(CartView::from_lines(user_id, kind, lines))
}

/// Add a line. With a `service_id` the name and price come from the catalog
/// and an existing line for that service has its quantity bumped instead.
#[instrument(skip(db, input))]
pub async fn add_item(db: &DatabaseConnection, kind: CartKind, input: AddCartItem) -> Result<CartView, ServiceError> {
    let user_id = validate::required("user_id", input.user_id)?;
    let quantity = cart_item::validate_quantity(input.quantity.unwrap_or(1))?;

    let (name, price) = match input.service_id {
        Some(sid) => {
            let svc = service::Entity::find_by_id(sid)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("service"))?;
            if svc.kind != kind.as_str() {
                return Err(ServiceError::Validation(format!("service {sid} cannot go in the {kind} cart")));
            }
            (svc.name, svc.price_cents)
        }
        None => {
            let name = validate::required_text("name", input.name.as_deref())?;
            let price = validate::required("unit_price_cents", input.unit_price_cents)?;
            (name, validate::non_negative_cents("unit_price_cents", price)?)
        }
    };

    let existing = match input.service_id {
        Some(sid) => cart_item::Entity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::CartKind.eq(kind.as_str()))
            .filter(cart_item::Column::ServiceId.eq(sid))
            .one(db)
            .await?,
        None => None,
    };

    let now = Utc::now();
    match existing {
        Some(line) => {
            let merged = cart_item::validate_quantity(line.quantity + quantity)?;
            let mut am: cart_item::ActiveModel = line.into();
            am.quantity = Set(merged);
            am.unit_price_cents = Set(price);
            am.updated_at = Set(now.into());
            am.update(db).await?;
        }
        None => {
            cart_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                cart_kind: Set(kind.as_str().to_string()),
                service_id: Set(input.service_id),
                name: Set(name),
                unit_price_cents: Set(price),
                quantity: Set(quantity),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(db)
            .await?;
        }
    }
    info!(user_id = %user_id, kind = %kind, quantity, event = "cart_item_added", "added cart item");
    get_cart(db, user_id, kind).await
}

async fn find_line(db: &DatabaseConnection, kind: CartKind, id: Uuid) -> Result<cart_item::Model, ServiceError> {
    cart_item::Entity::find_by_id(id)
        .filter(cart_item::Column::CartKind.eq(kind.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("cart item"))
}

/// Set a line's quantity; zero removes the line.
pub async fn set_quantity(db: &DatabaseConnection, kind: CartKind, id: Uuid, quantity: Option<i32>) -> Result<CartView, ServiceError> {
    let quantity = validate::required("quantity", quantity)?;
    let line = find_line(db, kind, id).await?;
    let user_id = line.user_id;
    if quantity == 0 {
        cart_item::Entity::delete_by_id(id).exec(db).await?;
    } else {
        let mut am: cart_item::ActiveModel = line.into();
        am.quantity = Set(cart_item::validate_quantity(quantity)?);
        am.updated_at = Set(Utc::now().into());
        am.update(db).await?;
    }
    get_cart(db, user_id, kind).await
}

/// Remove one line; returns the remaining cart.
pub async fn remove_item(db: &DatabaseConnection, kind: CartKind, id: Uuid) -> Result<CartView, ServiceError> {
    let line = find_line(db, kind, id).await?;
    cart_item::Entity::delete_by_id(id).exec(db).await?;
    get_cart(db, line.user_id, kind).await
}

/// Empty the cart; returns how many lines were removed.
pub async fn clear_cart(db: &DatabaseConnection, user_id: Uuid, kind: CartKind) -> Result<u64, ServiceError> {
    let res = cart_item::Entity::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::CartKind.eq(kind.as_str()))
        .exec(db)
        .await?;
    info!(user_id = %user_id, kind = %kind, removed = res.rows_affected, event = "cart_cleared", "cleared cart");
    Ok(res.rows_affected)
}
