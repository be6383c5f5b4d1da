//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the object storage root exists, creating it when missing.
pub async fn ensure_env(storage_root: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(storage_root).await.is_err() {
        info!(%storage_root, event = "storage_root_create", "creating storage root");
    }
    tokio::fs::create_dir_all(storage_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {storage_root}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_nested_storage_root() {
        let root = std::env::temp_dir().join(format!("bucks-env-{}", std::process::id())).join("a/b");
        let root_str = root.to_string_lossy().to_string();
        ensure_env(&root_str).await.unwrap();
        assert!(root.is_dir());
        // second call is a no-op
        ensure_env(&root_str).await.unwrap();
    }
}
