use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::vehicles::{self, VehicleInput};
use service::views::VehicleView;

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct VehicleQuery {
    pub user_id: Option<Uuid>,
}

#[utoipa::path(get, path = "/api/vehicles", tag = "vehicles", params(VehicleQuery), responses((status = 200, description = "Vehicles, primary first"), (status = 400, description = "user_id is required")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<VehicleQuery>,
) -> Result<Json<Vec<VehicleView>>, JsonApiError> {
    let user_id = q.user_id.ok_or_else(|| JsonApiError::bad_request("user_id is required"))?;
    Ok(Json(vehicles::list_vehicles(&state.db, user_id).await?))
}

#[utoipa::path(
    post, path = "/api/vehicles", tag = "vehicles",
    request_body = crate::openapi::VehicleDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<VehicleInput>,
) -> Result<(StatusCode, Json<VehicleView>), JsonApiError> {
    let v = vehicles::create_vehicle(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(v)))
}

#[utoipa::path(get, path = "/api/vehicles/{id}", tag = "vehicles", params(("id" = Uuid, Path, description = "Vehicle id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<VehicleView>, JsonApiError> {
    vehicles::get_vehicle(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("vehicle"))
}

#[utoipa::path(
    put, path = "/api/vehicles/{id}", tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    request_body = crate::openapi::VehicleDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<VehicleInput>,
) -> Result<Json<VehicleView>, JsonApiError> {
    Ok(Json(vehicles::update_vehicle(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/vehicles/{id}", tag = "vehicles", params(("id" = Uuid, Path, description = "Vehicle id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match vehicles::delete_vehicle(&state.db, id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("vehicle")),
    }
}
