//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::check_store_dir` without depending directly on `common`.

use std::path::Path;

/// Check the store root is a directory after the store has opened it.
pub async fn check_store_dir(root: &Path) -> anyhow::Result<()> {
    common::env::check_store_dir(root).await
}
