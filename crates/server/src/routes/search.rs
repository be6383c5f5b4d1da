use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use tracing::info;

use common::pagination::clamp_limit;
use service::search::{self, SearchResults, SearchScope};

use crate::errors::{ApiQuery, JsonApiError};
use crate::state::ServerState;

pub const SEARCH_DEFAULT_LIMIT: u64 = 20;
pub const SEARCH_MAX_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// all | posts | profiles | skillsets | services
    pub scope: Option<String>,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get, path = "/api/search", tag = "search",
    params(SearchQuery),
    responses((status = 200, description = "Matches grouped by resource"), (status = 400, description = "Blank query or unknown scope"))
)]
pub async fn search(
    State(state): State<ServerState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResults>, JsonApiError> {
    let scope: SearchScope = params.scope.as_deref().unwrap_or_default().parse()?;
    let limit = clamp_limit(params.limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT);
    let results = search::search(&state.db, params.q.as_deref(), scope, limit).await?;
    info!(query = %results.query, total = results.total(), "search");
    Ok(Json(results))
}
