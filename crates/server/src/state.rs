use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::ai::AssistService;
use service::storage::ObjectStore;
use service::uploads::UploadPolicy;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn ObjectStore>,
    /// Directory served under `/storage`.
    pub storage_dir: PathBuf,
    pub uploads: UploadPolicy,
    pub assist: AssistService,
}
