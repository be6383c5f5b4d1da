use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{validate_key, ObjectStore};
use crate::errors::ServiceError;

/// Filesystem-backed object store.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P, public_base_url: impl Into<String>) -> Self {
        let mut base: String = public_base_url.into();
        while base.len() > 1 && base.ends_with('/') {
            base.pop();
        }
        Self { root: root.into(), public_base_url: base }
    }

    pub fn root(&self) -> &PathBuf { &self.root }

    fn path_for(&self, key: &str) -> Result<PathBuf, ServiceError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        fs::write(&path, bytes).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        debug!(%key, size = bytes.len(), %content_type, "object stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, ServiceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        let path = self.path_for(key)?;
        Ok(fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
