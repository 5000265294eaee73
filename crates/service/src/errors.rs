use thiserror::Error;

/// Failures of the document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("corrupt document: {0}")]
    Corrupt(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub fn not_found(name: &str) -> Self { Self::NotFound(format!("{} not found", name)) }

    pub(crate) fn io(op: &str, path: &std::path::Path, e: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("{op} {}: {e}", path.display()))
    }
}
