//! Boundary to the remote document store
//!
//! The concrete network client is not part of this crate. Anything that can
//! create, list, update and delete schemaless documents in a named
//! collection can back the repository by implementing [`DocumentStore`].
//!
//! # Examples
//!
//! ```no_run
//! use libtrain::store::{DocumentStore, memory::MemoryStore};
//!
//! # async fn example() -> Result<(), libtrain::StoreError> {
//! let store = MemoryStore::new();
//!
//! let mut fields = serde_json::Map::new();
//! fields.insert("name".to_string(), "Leg day".into());
//!
//! let id = store.create_document("trains", fields).await?;
//! let documents = store.list_documents("trains").await?;
//! assert_eq!(documents[0].id, id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

/// Schemaless document body
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A document as returned by the store, with its store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

/// Errors raised by a store implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or dropped the connection
    #[error("Network error: {0}")]
    Network(String),

    /// The store refused the request (missing document, permissions, ...)
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl StoreError {
    /// The store's own message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            StoreError::Network(message) | StoreError::Rejected(message) => message,
        }
    }
}

/// Document store trait
///
/// Every method may fail or stall indefinitely; callers are expected to put
/// their own deadline around each call.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document and return the id the store assigned to it
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// All documents of a collection in store-defined order
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Merge `fields` into an existing document
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` if the document does not exist.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
