use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::profiles::{self, BusinessProfileInput, ProfileFilter};
use service::views::BusinessProfileView;

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ProfileQuery {
    pub owner_id: Option<Uuid>,
    pub category: Option<String>,
}

#[utoipa::path(get, path = "/api/profiles", tag = "profiles", params(ProfileQuery), responses((status = 200, description = "Business profiles")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ProfileQuery>,
) -> Result<Json<Vec<BusinessProfileView>>, JsonApiError> {
    let filter = ProfileFilter { owner_id: q.owner_id, category: q.category };
    Ok(Json(profiles::list_profiles(&state.db, filter).await?))
}

#[utoipa::path(
    post, path = "/api/profiles", tag = "profiles",
    request_body = crate::openapi::BusinessProfileDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<BusinessProfileInput>,
) -> Result<(StatusCode, Json<BusinessProfileView>), JsonApiError> {
    let view = profiles::create_profile(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(get, path = "/api/profiles/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "Profile id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BusinessProfileView>, JsonApiError> {
    profiles::get_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("business profile"))
}

#[utoipa::path(
    put, path = "/api/profiles/{id}", tag = "profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = crate::openapi::BusinessProfileDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<BusinessProfileInput>,
) -> Result<Json<BusinessProfileView>, JsonApiError> {
    Ok(Json(profiles::update_profile(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/profiles/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "Profile id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match profiles::delete_profile(&state.db, id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("business profile")),
    }
}
