//! Object storage behind the upload endpoint.
//!
//! `ObjectStore` is the seam between the upload flow and wherever bytes end
//! up; `LocalObjectStore` keeps them on disk under a root directory that the
//! HTTP layer serves statically.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod local;

pub use local::LocalObjectStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, replacing any existing one under the same key.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError>;
    /// Remove an object; returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, ServiceError>;
    async fn exists(&self, key: &str) -> Result<bool, ServiceError>;
    /// URL clients use to fetch the object.
    fn public_url(&self, key: &str) -> String;
}

/// Keys are `/`-separated segments of ASCII alphanumerics, `.`, `_` or `-`;
/// no empty, `.` or `..` segments.
pub fn validate_key(key: &str) -> Result<(), ServiceError> {
    let ok = !key.is_empty()
        && key.len() <= 512
        && key.split('/').all(|seg| {
            !seg.is_empty()
                && seg != "."
                && seg != ".."
                && seg.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });
    if !ok {
        return Err(ServiceError::Validation(format!("invalid storage key '{key}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_key;

    #[test]
    fn key_rules() {
        assert!(validate_key("uploads/1700000000000-abc.png").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs.png").is_err());
        assert!(validate_key("a//b.png").is_err());
        assert!(validate_key("a/b c.png").is_err());
        assert!(validate_key("").is_err());
    }
}
