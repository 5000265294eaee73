//! Environment/runtime helpers
//!
//! Sanity checks on the store directory at startup. Creating it is the
//! store's job; this only verifies what the store ended up with.

use std::path::Path;

use tracing::{info, warn};

/// Verify the store root exists and is a directory; warn if it is read-only.
pub async fn check_store_dir(root: &Path) -> anyhow::Result<()> {
    let meta = tokio::fs::metadata(root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot stat {}: {e}", root.display()))?;
    if !meta.is_dir() {
        return Err(anyhow::anyhow!("{} is not a directory", root.display()));
    }
    if meta.permissions().readonly() {
        warn!(root = %root.display(), "store directory is read-only; uploads will fail");
    }
    info!(root = %root.display(), "store directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_existing_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("check_store_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&root).await?;
        check_store_dir(&root).await?;
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_dir_is_not_created() {
        let root = std::env::temp_dir().join(format!("check_store_missing_{}", uuid::Uuid::new_v4()));
        assert!(check_store_dir(&root).await.is_err());
        assert!(tokio::fs::metadata(&root).await.is_err());
    }

    #[tokio::test]
    async fn rejects_plain_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("check_store_file_{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"x").await?;
        assert!(check_store_dir(&path).await.is_err());
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
