//! Storage abstractions for the document store.
//!
//! Request handlers depend on `DocumentStore` only, so the flat directory
//! backend can be swapped for another one without touching routing.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

pub mod fs_store;
pub mod memory_store;
pub mod name;

pub use fs_store::FsDocumentStore;
pub use memory_store::MemoryDocumentStore;
pub use name::DocumentName;

/// Flat `name -> JSON` store. Saving an existing name replaces it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `content` under `name`, replacing any previous document.
    async fn save(&self, name: &DocumentName, content: &Value) -> Result<(), StoreError>;
    /// Read back a document; `NotFound` if it was never saved.
    async fn load(&self, name: &DocumentName) -> Result<Value, StoreError>;
    /// All stored names, sorted.
    async fn list(&self) -> Result<Vec<String>, StoreError>;
    async fn exists(&self, name: &DocumentName) -> Result<bool, StoreError>;
}
