use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

use super::name::{DocumentName, STAGING_DIR};
use super::DocumentStore;
use crate::errors::StoreError;
use crate::json::{self, DEFAULT_MAX_DEPTH};

/// One JSON file per document in a flat directory.
///
/// Writes go to a uniquely named temp file under `<root>/.staging` and are
/// renamed over the target, so readers see either the old or the new file.
/// Nothing is cached: every call hits the directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    staging: PathBuf,
    max_depth: usize,
}

impl FsDocumentStore {
    /// Open the store at `root` with the default nesting limit.
    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Arc<Self>, StoreError> {
        Self::with_max_depth(root, DEFAULT_MAX_DEPTH).await
    }

    /// Open the store at `root`, creating it and its staging dir if missing.
    /// Temp files left behind by a crashed writer are removed. Stored files
    /// nested deeper than `max_depth` load as `Corrupt`.
    pub async fn with_max_depth<P: Into<PathBuf>>(
        root: P,
        max_depth: usize,
    ) -> Result<Arc<Self>, StoreError> {
        let root = root.into();
        let staging = root.join(STAGING_DIR);
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| StoreError::io("create", &staging, e))?;

        let store = Self { root, staging, max_depth };
        store.sweep_staging().await;
        Ok(Arc::new(store))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &DocumentName) -> PathBuf {
        self.root.join(name.as_str())
    }

    async fn sweep_staging(&self) {
        let mut entries = match fs::read_dir(&self.staging).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "cannot scan staging directory");
                return;
            }
        };
        let mut removed = 0usize;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "removed stale temp files");
        }
    }

    async fn write_temp(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn save(&self, name: &DocumentName, content: &Value) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(content)
            .map_err(|e| StoreError::StorageUnavailable(format!("serialize {name}: {e}")))?;

        let target = self.path_for(name);
        let tmp = self.staging.join(format!("{}.tmp", uuid::Uuid::new_v4()));

        if let Err(e) = self.write_temp(&tmp, &bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io("write", &tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io("replace", &target, e));
        }

        info!(name = %name, path = %target.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    async fn load(&self, name: &DocumentName) -> Result<Value, StoreError> {
        let path = self.path_for(name);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found(name.as_str()))
            }
            Err(e) => {
                // a subdirectory is not a document; list() agrees
                if is_dir(&path).await {
                    debug!(name = %name, error = %e, "load hit a directory");
                    return Err(StoreError::not_found(name.as_str()));
                }
                return Err(StoreError::io("read", &path, e));
            }
        };
        debug!(name = %name, bytes = bytes.len(), "loaded document");
        json::from_slice(&bytes, self.max_depth).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io("list", &self.root, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io("list", &self.root, e))?
        {
            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "skipping non UTF-8 file name"),
            }
        }
        names.sort();
        debug!(count = names.len(), "listed documents");
        Ok(names)
    }

    async fn exists(&self, name: &DocumentName) -> Result<bool, StoreError> {
        let path = self.path_for(name);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io("stat", &path, e)),
        }
    }
}
