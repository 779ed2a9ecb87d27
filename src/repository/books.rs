//! Books repository for document store operations

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    models::book::{Book, ValidatedBookDraft},
    store::{Document, DocumentStore, Order, StoreResult},
};

const BOOKS_COLLECTION: &str = "books";

#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<dyn DocumentStore>,
}

/// Rebuild a `Book` from a document, attaching the store key as `id`.
fn decode(document: Document) -> StoreResult<Book> {
    let mut fields = document.fields;
    fields.insert("id".to_string(), Value::String(document.key));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

impl BooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All books, ordered by title ascending.
    pub async fn list(&self) -> StoreResult<Vec<Book>> {
        let documents = self
            .store
            .list(BOOKS_COLLECTION, "title", Order::Ascending)
            .await?;
        documents.into_iter().map(decode).collect()
    }

    /// Point read by id; preferred over list-then-filter to keep the
    /// staleness window of the borrow/return sequence small.
    pub async fn get(&self, id: &str) -> StoreResult<Book> {
        decode(self.store.get(BOOKS_COLLECTION, id).await?)
    }

    /// Create a book with every copy initially available; returns the
    /// canonical stored record including the store-assigned id and
    /// creation timestamp.
    pub async fn create(&self, draft: &ValidatedBookDraft) -> StoreResult<Book> {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(draft.title().to_string()));
        fields.insert(
            "author".to_string(),
            Value::String(draft.author().to_string()),
        );
        if let Some(isbn) = draft.isbn() {
            fields.insert("isbn".to_string(), Value::String(isbn.to_string()));
        }
        fields.insert("quantity".to_string(), Value::from(draft.quantity()));
        fields.insert("available".to_string(), Value::from(draft.quantity()));

        let key = self.store.create(BOOKS_COLLECTION, fields).await?;
        self.get(&key).await
    }

    /// Overwrite the availability counter. This is a plain last-write-wins
    /// update, not a compare-and-swap against a previously read value.
    pub async fn set_available(&self, id: &str, available: u32) -> StoreResult<()> {
        let mut fields = Map::new();
        fields.insert("available".to_string(), Value::from(available));
        self.store.update(BOOKS_COLLECTION, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(BOOKS_COLLECTION, id).await
    }
}
