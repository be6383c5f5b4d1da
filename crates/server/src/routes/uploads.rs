use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use service::uploads::{self, UploadRequest, UploadedObject};

use crate::errors::{ApiPath, JsonApiError};
use crate::state::ServerState;

/// Collect the `file` part and optional `folder` text part.
async fn read_form(mut form: Multipart) -> Result<UploadRequest, JsonApiError> {
    let mut req = UploadRequest::default();
    let mut saw_file = false;
    while let Some(field) = form.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                req.file_name = field.file_name().map(str::to_string);
                req.content_type = field.content_type().map(str::to_string);
                req.bytes = field.bytes().await?.to_vec();
                saw_file = true;
            }
            Some("folder") => req.folder = Some(field.text().await?),
            _ => {}
        }
    }
    if !saw_file {
        return Err(JsonApiError::bad_request("file is required"));
    }
    Ok(req)
}

#[utoipa::path(
    post, path = "/api/uploads", tag = "uploads",
    request_body(content = crate::openapi::UploadFormDoc, content_type = "multipart/form-data"),
    responses((status = 201, description = "Stored", body = crate::openapi::UploadedDoc), (status = 400, description = "Missing, oversized or unsupported file"))
)]
pub async fn upload(
    State(state): State<ServerState>,
    form: Multipart,
) -> Result<(StatusCode, Json<UploadedObject>), JsonApiError> {
    let req = read_form(form).await?;
    let out = uploads::upload(state.storage.as_ref(), &state.uploads, req).await?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[utoipa::path(
    delete, path = "/api/uploads/{key}", tag = "uploads",
    params(("key" = String, Path, description = "Storage key, may contain '/'")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(key): ApiPath<String>,
) -> Result<StatusCode, JsonApiError> {
    uploads::delete_upload(state.storage.as_ref(), &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
