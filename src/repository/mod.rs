//! Repository layer for document store access

pub mod books;
pub mod transactions;

use std::sync::Arc;

use crate::store::DocumentStore;

/// Main repository struct holding the shared store handle
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub transactions: transactions::TransactionsRepository,
}

impl Repository {
    /// Create a new repository over the given document store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            books: books::BooksRepository::new(store.clone()),
            transactions: transactions::TransactionsRepository::new(store),
        }
    }
}
