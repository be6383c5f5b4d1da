use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::skillsets::{self, SkillsetInput};
use service::views::SkillsetProfileView;

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SkillQuery {
    /// Only profiles listing this skill (case-insensitive).
    pub skill: Option<String>,
}

#[utoipa::path(get, path = "/api/skillset-profiles", tag = "skillsets", params(SkillQuery), responses((status = 200, description = "Skillset profiles")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<SkillQuery>,
) -> Result<Json<Vec<SkillsetProfileView>>, JsonApiError> {
    Ok(Json(skillsets::list_profiles(&state.db, q.skill.as_deref()).await?))
}

/// Upsert keyed by `user_id`: 201 when created, 200 when updated.
#[utoipa::path(
    post, path = "/api/skillset-profiles", tag = "skillsets",
    request_body = crate::openapi::SkillsetDoc,
    responses((status = 201, description = "Created"), (status = 200, description = "Updated"), (status = 400, description = "Validation Error"))
)]
pub async fn upsert(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<SkillsetInput>,
) -> Result<(StatusCode, Json<SkillsetProfileView>), JsonApiError> {
    let (view, created) = skillsets::upsert_profile(&state.db, input).await?;
    info!(id = %view.id, created, "upsert skillset profile");
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(view)))
}

#[utoipa::path(get, path = "/api/skillset-profiles/{id}", tag = "skillsets", params(("id" = Uuid, Path, description = "Profile id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SkillsetProfileView>, JsonApiError> {
    skillsets::get_profile(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("skillset profile"))
}

#[utoipa::path(get, path = "/api/skillset-profiles/by-user/{user_id}", tag = "skillsets", params(("user_id" = Uuid, Path, description = "Owner user id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_by_user(
    State(state): State<ServerState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<SkillsetProfileView>, JsonApiError> {
    skillsets::get_by_user(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("skillset profile"))
}

#[utoipa::path(delete, path = "/api/skillset-profiles/{id}", tag = "skillsets", params(("id" = Uuid, Path, description = "Profile id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match skillsets::delete_profile(&state.db, id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("skillset profile")),
    }
}
