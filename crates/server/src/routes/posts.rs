use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{clamp_limit, Pagination};
use service::posts::{self, NewComment, NewPost, PostUpdate};
use service::views::{CommentView, FeedItem, RecommendationView, RecommendedPost};

use crate::errors::{ApiJson, ApiPath, ApiQuery, JsonApiError};
use crate::state::ServerState;

pub const RECOMMENDED_DEFAULT: u64 = 10;
pub const RECOMMENDED_MAX: u64 = 50;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PostQuery {
    pub user_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagInput {
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendInput {
    pub user_id: Option<Uuid>,
}

fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let d = Pagination::default();
    Pagination { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) }
}

#[utoipa::path(get, path = "/api/posts", tag = "posts", params(PostQuery), responses((status = 200, description = "Posts newest first")))]
pub async fn list_posts(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<PostQuery>,
) -> Result<Json<Vec<FeedItem>>, JsonApiError> {
    let list = posts::list_posts(&state.db, q.user_id, pagination(q.page, q.per_page)).await?;
    Ok(Json(list))
}

#[utoipa::path(
    post, path = "/api/posts", tag = "posts",
    request_body = crate::openapi::NewPostDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create_post(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewPost>,
) -> Result<(StatusCode, Json<FeedItem>), JsonApiError> {
    let item = posts::create_post(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(get, path = "/api/posts/{id}", tag = "posts", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_post(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FeedItem>, JsonApiError> {
    posts::get_post(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("post"))
}

#[utoipa::path(
    put, path = "/api/posts/{id}", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = crate::openapi::PostUpdateDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update_post(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<PostUpdate>,
) -> Result<Json<FeedItem>, JsonApiError> {
    Ok(Json(posts::update_post(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/posts/{id}", tag = "posts", params(("id" = Uuid, Path, description = "Post id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_post(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    match posts::delete_post(&state.db, id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("post")),
    }
}

#[utoipa::path(get, path = "/api/posts/{id}/tags", tag = "posts", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "Tags"), (status = 404, description = "Not Found")))]
pub async fn list_tags(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<String>>, JsonApiError> {
    Ok(Json(posts::list_tags(&state.db, id).await?))
}

#[utoipa::path(
    post, path = "/api/posts/{id}/tags", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = crate::openapi::TagDoc,
    responses((status = 201, description = "Tag attached"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn add_tag(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<TagInput>,
) -> Result<(StatusCode, Json<Vec<String>>), JsonApiError> {
    let tags = posts::add_tag(&state.db, id, input.tag.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(tags)))
}

#[utoipa::path(
    delete, path = "/api/posts/{id}/tags/{tag}", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id"), ("tag" = String, Path, description = "Tag")),
    responses((status = 204, description = "Removed"), (status = 404, description = "Not Found"))
)]
pub async fn remove_tag(
    State(state): State<ServerState>,
    ApiPath((id, tag)): ApiPath<(Uuid, String)>,
) -> Result<StatusCode, JsonApiError> {
    match posts::remove_tag(&state.db, id, &tag).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("tag")),
    }
}

#[utoipa::path(get, path = "/api/posts/{id}/comments", tag = "posts", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "Comments oldest first"), (status = 404, description = "Not Found")))]
pub async fn list_comments(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<CommentView>>, JsonApiError> {
    Ok(Json(posts::list_comments(&state.db, id).await?))
}

#[utoipa::path(
    post, path = "/api/posts/{id}/comments", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = crate::openapi::NewCommentDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn add_comment(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<NewComment>,
) -> Result<(StatusCode, Json<CommentView>), JsonApiError> {
    let c = posts::add_comment(&state.db, id, input).await?;
    Ok((StatusCode::CREATED, Json(c)))
}

#[utoipa::path(get, path = "/api/posts/{id}/recommendations", tag = "posts", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "Recommendations"), (status = 404, description = "Not Found")))]
pub async fn list_recommendations(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<RecommendationView>>, JsonApiError> {
    Ok(Json(posts::list_recommendations(&state.db, id).await?))
}

#[utoipa::path(
    post, path = "/api/posts/{id}/recommendations", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = crate::openapi::RecommendDoc,
    responses((status = 200, description = "Recommended (idempotent)"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn recommend(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<RecommendInput>,
) -> Result<Json<RecommendationView>, JsonApiError> {
    Ok(Json(posts::recommend(&state.db, id, input.user_id).await?))
}

#[utoipa::path(
    delete, path = "/api/posts/{id}/recommendations/{user_id}", tag = "posts",
    params(("id" = Uuid, Path, description = "Post id"), ("user_id" = Uuid, Path, description = "Recommending user")),
    responses((status = 204, description = "Removed"), (status = 404, description = "Not Found"))
)]
pub async fn unrecommend(
    State(state): State<ServerState>,
    ApiPath((id, user_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, JsonApiError> {
    match posts::unrecommend(&state.db, id, user_id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(JsonApiError::not_found("recommendation")),
    }
}

#[utoipa::path(get, path = "/api/feed", tag = "feed", params(PageQuery), responses((status = 200, description = "Feed newest first")))]
pub async fn feed(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Vec<FeedItem>>, JsonApiError> {
    let items = posts::feed(&state.db, pagination(q.page, q.per_page)).await?;
    info!(count = items.len(), "feed");
    Ok(Json(items))
}

#[utoipa::path(get, path = "/api/feed/recommended", tag = "feed", params(LimitQuery), responses((status = 200, description = "Posts ranked by recommendations")))]
pub async fn recommended(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<LimitQuery>,
) -> Result<Json<Vec<RecommendedPost>>, JsonApiError> {
    let limit = clamp_limit(q.limit, RECOMMENDED_DEFAULT, RECOMMENDED_MAX);
    Ok(Json(posts::recommended_posts(&state.db, limit).await?))
}
