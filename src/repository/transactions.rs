//! Transactions repository for the append-only borrow/return log

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    models::transaction::{Transaction, TransactionAction},
    store::{Document, DocumentStore, Order, StoreResult},
};

const TRANSACTIONS_COLLECTION: &str = "transactions";

#[derive(Clone)]
pub struct TransactionsRepository {
    store: Arc<dyn DocumentStore>,
}

fn decode(document: Document) -> StoreResult<Transaction> {
    let mut fields = document.fields;
    fields.insert("id".to_string(), Value::String(document.key));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

impl TransactionsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append one log entry; the store stamps the timestamp server-side.
    pub async fn append(&self, book_id: &str, action: TransactionAction) -> StoreResult<()> {
        let mut fields = Map::new();
        fields.insert("bookId".to_string(), Value::String(book_id.to_string()));
        fields.insert("action".to_string(), serde_json::to_value(action)?);
        self.store
            .create(TRANSACTIONS_COLLECTION, fields)
            .await
            .map(|_| ())
    }

    /// History for one book, newest first.
    ///
    /// The store offers single-field ordering only, so the full log is
    /// fetched ordered by timestamp and filtered to the book client-side.
    pub async fn list_for_book(&self, book_id: &str) -> StoreResult<Vec<Transaction>> {
        let documents = self
            .store
            .list(TRANSACTIONS_COLLECTION, "createdAt", Order::Descending)
            .await?;
        let transactions: Vec<Transaction> = documents
            .into_iter()
            .map(decode)
            .collect::<StoreResult<_>>()?;
        Ok(transactions
            .into_iter()
            .filter(|t| t.book_id == book_id)
            .collect())
    }
}
