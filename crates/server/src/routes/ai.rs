use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiJson, JsonApiError};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct AskInput {
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestInput {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestOutput {
    pub suggestions: Vec<String>,
}

#[utoipa::path(
    post, path = "/api/ai/ask", tag = "ai",
    request_body = crate::openapi::AskDoc,
    responses((status = 200, description = "Answer, or a fallback message when the model is unavailable"), (status = 400, description = "question is required"))
)]
pub async fn ask(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<AskInput>,
) -> Result<Json<AskOutput>, JsonApiError> {
    let answer = state.assist.ask(input.question.as_deref()).await?;
    Ok(Json(AskOutput { answer }))
}

#[utoipa::path(
    post, path = "/api/ai/search-suggestions", tag = "ai",
    request_body = crate::openapi::SuggestDoc,
    responses((status = 200, description = "Up to five search terms"), (status = 400, description = "query is required"))
)]
pub async fn search_suggestions(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<SuggestInput>,
) -> Result<Json<SuggestOutput>, JsonApiError> {
    let suggestions = state.assist.suggest_search_terms(input.query.as_deref()).await?;
    Ok(Json(SuggestOutput { suggestions }))
}
