//! Document store boundary.
//!
//! The catalog is backed by a hosted key-document database. Everything above
//! this module sees only [`DocumentStore`]: flat JSON documents grouped into
//! collections, listed with single-field ordering. The store assigns document
//! keys and creation timestamps; no compound queries or conditional writes
//! are assumed to exist.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// A stored document: store-assigned key plus its JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Map<String, Value>,
}

/// Sort direction for [`DocumentStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Store-level error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected store response: {0}")]
    Response(String),

    #[error("Malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract consumed by the repository layer.
///
/// `create` assigns the key and a server-side `createdAt` timestamp so record
/// ordering never depends on client clocks. `update` merges partial fields
/// into the existing document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List all documents in a collection, ordered by a single field.
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: Order,
    ) -> StoreResult<Vec<Document>>;

    /// Point read by key. Fails with [`StoreError::NotFound`] if absent.
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Document>;

    /// Create a document; returns the store-assigned key.
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String>;

    /// Merge partial fields into an existing document.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()>;

    /// Remove a document. Removing an absent key is not an error.
    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()>;
}
