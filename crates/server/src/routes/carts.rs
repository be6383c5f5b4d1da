use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::cart_item::CartKind;
use service::carts::{self, AddCartItem};
use service::errors::ServiceError;
use service::views::CartView;

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CartQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuantityInput {
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub removed: u64,
}

fn cart_kind(raw: &str) -> Result<CartKind, JsonApiError> {
    Ok(raw.parse::<CartKind>().map_err(ServiceError::from)?)
}

fn required_user(q: &CartQuery) -> Result<Uuid, JsonApiError> {
    q.user_id.ok_or_else(|| JsonApiError::bad_request("user_id is required"))
}

#[utoipa::path(
    get, path = "/api/carts/{kind}", tag = "carts",
    params(("kind" = String, Path, description = "shop | food"), CartQuery),
    responses((status = 200, description = "Cart with totals"), (status = 400, description = "Unknown kind or missing user_id"))
)]
pub async fn get_cart(
    State(state): State<ServerState>,
    ApiPath(kind): ApiPath<String>,
    ApiQuery(q): ApiQuery<CartQuery>,
) -> Result<Json<CartView>, JsonApiError> {
    let kind = cart_kind(&kind)?;
    let user_id = required_user(&q)?;
    Ok(Json(carts::get_cart(&state.db, user_id, kind).await?))
}

#[utoipa::path(
    post, path = "/api/carts/{kind}/items", tag = "carts",
    params(("kind" = String, Path, description = "shop | food")),
    request_body = crate::openapi::AddCartItemDoc,
    responses((status = 200, description = "Updated cart"), (status = 400, description = "Validation Error"), (status = 404, description = "Service not found"))
)]
pub async fn add_item(
    State(state): State<ServerState>,
    ApiPath(kind): ApiPath<String>,
    ApiJson(input): ApiJson<AddCartItem>,
) -> Result<Json<CartView>, JsonApiError> {
    let kind = cart_kind(&kind)?;
    Ok(Json(carts::add_item(&state.db, kind, input).await?))
}

#[utoipa::path(
    patch, path = "/api/carts/{kind}/items/{id}", tag = "carts",
    params(("kind" = String, Path, description = "shop | food"), ("id" = Uuid, Path, description = "Cart line id")),
    request_body = crate::openapi::QuantityDoc,
    responses((status = 200, description = "Updated cart"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn set_quantity(
    State(state): State<ServerState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
    ApiJson(input): ApiJson<QuantityInput>,
) -> Result<Json<CartView>, JsonApiError> {
    let kind = cart_kind(&kind)?;
    Ok(Json(carts::set_quantity(&state.db, kind, id, input.quantity).await?))
}

#[utoipa::path(
    delete, path = "/api/carts/{kind}/items/{id}", tag = "carts",
    params(("kind" = String, Path, description = "shop | food"), ("id" = Uuid, Path, description = "Cart line id")),
    responses((status = 200, description = "Remaining cart"), (status = 404, description = "Not Found"))
)]
pub async fn remove_item(
    State(state): State<ServerState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
) -> Result<Json<CartView>, JsonApiError> {
    let kind = cart_kind(&kind)?;
    Ok(Json(carts::remove_item(&state.db, kind, id).await?))
}

#[utoipa::path(
    delete, path = "/api/carts/{kind}", tag = "carts",
    params(("kind" = String, Path, description = "shop | food"), CartQuery),
    responses((status = 200, description = "Number of removed lines"), (status = 400, description = "Unknown kind or missing user_id"))
)]
pub async fn clear_cart(
    State(state): State<ServerState>,
    ApiPath(kind): ApiPath<String>,
    ApiQuery(q): ApiQuery<CartQuery>,
) -> Result<Json<Cleared>, JsonApiError> {
    let kind = cart_kind(&kind)?;
    let user_id = required_user(&q)?;
    let removed = carts::clear_cart(&state.db, user_id, kind).await?;
    Ok(Json(Cleared { removed }))
}
