use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::cart_item::CartKind;
use service::catalog::{self, NewCategory, NewService, ServiceFilter};
use service::errors::ServiceError;
use service::views::{CategoryView, ServiceView};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ServiceQuery {
    pub category_id: Option<Uuid>,
    /// `shop` or `food`
    pub kind: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/api/categories", tag = "catalog", responses((status = 200, description = "Categories by sort order")))]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, JsonApiError> {
    Ok(Json(catalog::list_categories(&state.db).await?))
}

#[utoipa::path(
    post, path = "/api/categories", tag = "catalog",
    request_body = crate::openapi::NewCategoryDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Slug already used")
    )
)]
pub async fn create_category(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<CategoryView>), JsonApiError> {
    let view = catalog::create_category(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(get, path = "/api/services", tag = "catalog", params(ServiceQuery), responses((status = 200, description = "List OK"), (status = 400, description = "Unknown kind")))]
pub async fn list_services(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ServiceQuery>,
) -> Result<Json<Vec<ServiceView>>, JsonApiError> {
    let kind = q
        .kind
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .map(str::parse::<CartKind>)
        .transpose()
        .map_err(ServiceError::from)?;
    let filter = ServiceFilter { category_id: q.category_id, kind };
    let page = Pagination { page: q.page.unwrap_or(1), per_page: q.per_page.unwrap_or(20) };
    let list = catalog::list_services(&state.db, filter, page).await?;
    info!(count = list.len(), "list services");
    Ok(Json(list))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "catalog", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_service(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ServiceView>, JsonApiError> {
    catalog::get_service(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("service"))
}

#[utoipa::path(
    post, path = "/api/services", tag = "catalog",
    request_body = crate::openapi::NewServiceDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create_service(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewService>,
) -> Result<(StatusCode, Json<ServiceView>), JsonApiError> {
    let view = catalog::create_service(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}
