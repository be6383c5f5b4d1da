//! Upload flow: size/type checks, key generation, then a single store write.

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use configs::StorageConfig;

use crate::errors::ServiceError;
use crate::storage::{validate_key, ObjectStore};

pub const DEFAULT_FOLDER: &str = "uploads";
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Accepted content types and the file extension stored objects get.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("video/mp4", "mp4"),
];

#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self { Self { max_bytes: DEFAULT_MAX_BYTES } }
}

impl From<&StorageConfig> for UploadPolicy {
    fn from(cfg: &StorageConfig) -> Self { Self { max_bytes: cfg.max_upload_bytes } }
}

/// One file pulled out of a multipart body.
#[derive(Clone, Debug, Default)]
pub struct UploadRequest {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub folder: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES.iter().find(|(ct, _)| *ct == content_type).map(|(_, ext)| *ext)
}

fn content_type_from_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        _ => None,
    }
}

/// Declared type wins unless it is absent or the generic octet-stream, in
/// which case the file name's extension decides.
fn resolve_content_type(req: &UploadRequest) -> Result<String, ServiceError> {
    let declared = req
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
    let resolved = match declared {
        Some(ct) => ct,
        None => req
            .file_name
            .as_deref()
            .and_then(content_type_from_name)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Validation("file content type is required".into()))?,
    };
    if extension_for(&resolved).is_none() {
        return Err(ServiceError::Validation(format!("unsupported content type '{resolved}'")));
    }
    Ok(resolved)
}

/// Lowercase, keep `[a-z0-9_-]`, fall back to `uploads` when nothing is left.
pub fn sanitize_folder(raw: Option<&str>) -> String {
    let cleaned: String = raw
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .take(64)
        .collect();
    if cleaned.is_empty() { DEFAULT_FOLDER.to_string() } else { cleaned }
}

pub fn storage_key(folder: &str, unix_millis: i64, id: Uuid, ext: &str) -> String {
    format!("{folder}/{unix_millis}-{id}.{ext}")
}

#[instrument(skip(store, req), fields(size = req.bytes.len()))]
pub async fn upload(
    store: &dyn ObjectStore,
    policy: &UploadPolicy,
    req: UploadRequest,
) -> Result<UploadedObject, ServiceError> {
    if req.bytes.is_empty() {
        return Err(ServiceError::Validation("file is required".into()));
    }
    if req.bytes.len() > policy.max_bytes {
        return Err(ServiceError::Validation(format!(
            "file exceeds the maximum size of {} bytes",
            policy.max_bytes
        )));
    }
    let content_type = resolve_content_type(&req)?;
    let ext = extension_for(&content_type).unwrap_or("bin");
    let folder = sanitize_folder(req.folder.as_deref());
    let key = storage_key(&folder, chrono::Utc::now().timestamp_millis(), Uuid::new_v4(), ext);

    store.put(&key, &req.bytes, &content_type).await?;
    info!(event = "upload.stored", %key, %content_type, size = req.bytes.len());
    Ok(UploadedObject { url: store.public_url(&key), size: req.bytes.len(), key, content_type })
}

pub async fn delete_upload(store: &dyn ObjectStore, key: &str) -> Result<(), ServiceError> {
    validate_key(key)?;
    if !store.delete(key).await? {
        return Err(ServiceError::not_found("upload"));
    }
    info!(event = "upload.deleted", %key);
    Ok(())
}
