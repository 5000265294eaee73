//! Service layer for the document store.
//! - `storage` holds the `DocumentStore` abstraction and its backends.
//! - Name validation lives next to the stores so every backend shares it.
//! - `json` decodes documents without serde_json's fixed depth limit.
//! - Handlers only ever see `StoreError`, never raw I/O errors.

pub mod errors;
pub mod json;
pub mod runtime;
pub mod storage;

pub use errors::StoreError;
pub use storage::{name::DocumentName, DocumentStore};
