use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod ai;
pub mod carts;
pub mod catalog;
pub mod posts;
pub mod profiles;
pub mod search;
pub mod skillsets;
pub mod uploads;
pub mod vehicles;

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: API, static storage, docs and health.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let upload_limit = state.uploads.max_bytes + MULTIPART_OVERHEAD;
    let storage_dir = ServeDir::new(&state.storage_dir);

    let catalog = Router::new()
        .route("/api/categories", get(catalog::list_categories).post(catalog::create_category))
        .route("/api/services", get(catalog::list_services).post(catalog::create_service))
        .route("/api/services/:id", get(catalog::get_service));

    let posts = Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id", get(posts::get_post).put(posts::update_post).delete(posts::delete_post))
        .route("/api/posts/:id/tags", get(posts::list_tags).post(posts::add_tag))
        .route("/api/posts/:id/tags/:tag", delete(posts::remove_tag))
        .route("/api/posts/:id/comments", get(posts::list_comments).post(posts::add_comment))
        .route("/api/posts/:id/recommendations", get(posts::list_recommendations).post(posts::recommend))
        .route("/api/posts/:id/recommendations/:user_id", delete(posts::unrecommend))
        .route("/api/feed", get(posts::feed))
        .route("/api/feed/recommended", get(posts::recommended));

    let profiles = Router::new()
        .route("/api/profiles", get(profiles::list).post(profiles::create))
        .route("/api/profiles/:id", get(profiles::get).put(profiles::update).delete(profiles::delete))
        .route("/api/skillset-profiles", get(skillsets::list).post(skillsets::upsert))
        .route("/api/skillset-profiles/by-user/:user_id", get(skillsets::get_by_user))
        .route("/api/skillset-profiles/:id", get(skillsets::get).delete(skillsets::delete));

    let vehicles = Router::new()
        .route("/api/vehicles", get(vehicles::list).post(vehicles::create))
        .route("/api/vehicles/:id", get(vehicles::get).put(vehicles::update).delete(vehicles::delete));

    let carts = Router::new()
        .route("/api/carts/:kind", get(carts::get_cart).delete(carts::clear_cart))
        .route("/api/carts/:kind/items", post(carts::add_item))
        .route("/api/carts/:kind/items/:id", patch(carts::set_quantity).delete(carts::remove_item));

    let misc = Router::new()
        .route("/api/search", get(search::search))
        .route(
            "/api/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/uploads/*key", delete(uploads::delete))
        .route("/api/ai/ask", post(ai::ask))
        .route("/api/ai/search-suggestions", post(ai::search_suggestions));

    Router::new()
        .route("/health", get(health))
        .merge(catalog)
        .merge(posts)
        .merge(profiles)
        .merge(vehicles)
        .merge(carts)
        .merge(misc)
        .nest_service("/storage", storage_dir)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
