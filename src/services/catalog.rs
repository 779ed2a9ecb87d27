//! Inventory gateway service.
//!
//! Owns the borrow/return availability-update protocol: read the current
//! record, check the availability bounds, write the adjusted counter back,
//! then append a best-effort log entry.
//!
//! The read-modify-write sequence is deliberately not atomic against other
//! clients. Two borrowers can both read `available == 1` and both write 0,
//! yielding two successful borrows against one remaining copy. The hosted
//! store offers no conditional write, so this is an accepted last-write-wins
//! limitation rather than a bug to paper over; single-client interleaving is
//! prevented cooperatively by `CatalogSession`'s per-id guard.

use std::sync::Arc;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{
        book::{Book, ValidatedBookDraft},
        transaction::{Transaction, TransactionAction},
    },
    repository::Repository,
    store::DocumentStore,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Convenience constructor over a bare store handle.
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(Repository::new(store))
    }

    /// All books, ordered by title ascending.
    pub async fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.repository
            .books
            .list()
            .await
            .map_err(CatalogError::StoreUnavailable)
    }

    /// Create a book from a validated draft, with `available = quantity` and
    /// a server-observed creation timestamp. Either the full record is
    /// created or nothing is; any write failure surfaces as store
    /// unavailability.
    pub async fn add_book(&self, draft: ValidatedBookDraft) -> CatalogResult<Book> {
        let book = self
            .repository
            .books
            .create(&draft)
            .await
            .map_err(CatalogError::StoreUnavailable)?;
        tracing::info!(book_id = %book.id, title = %book.title, "book added");
        Ok(book)
    }

    /// Borrow one copy: point read, bounds check, unconditional write of
    /// `available - 1`, detached log append.
    pub async fn borrow_book(&self, book_id: &str) -> CatalogResult<()> {
        let book = self.repository.books.get(book_id).await?;
        if book.available == 0 {
            return Err(CatalogError::Unavailable);
        }
        self.repository
            .books
            .set_available(book_id, book.available - 1)
            .await?;
        self.log_transaction(book_id, TransactionAction::Borrow);
        Ok(())
    }

    /// Return one copy: symmetric to borrow, writing `available + 1` unless
    /// every copy is already on the shelf.
    pub async fn return_book(&self, book_id: &str) -> CatalogResult<()> {
        let book = self.repository.books.get(book_id).await?;
        if book.available == book.quantity {
            return Err(CatalogError::AlreadyFull);
        }
        self.repository
            .books
            .set_available(book_id, book.available + 1)
            .await?;
        self.log_transaction(book_id, TransactionAction::Return);
        Ok(())
    }

    /// Remove a book unconditionally. No specified user flow calls this; it
    /// is exposed as part of the gateway contract.
    pub async fn delete_book(&self, book_id: &str) -> CatalogResult<()> {
        self.repository
            .books
            .delete(book_id)
            .await
            .map_err(CatalogError::StoreUnavailable)
    }

    /// Borrow/return history for one book, newest first.
    pub async fn book_transactions(&self, book_id: &str) -> CatalogResult<Vec<Transaction>> {
        self.repository
            .transactions
            .list_for_book(book_id)
            .await
            .map_err(CatalogError::StoreUnavailable)
    }

    /// Detached best-effort log append. Failure is logged and swallowed; it
    /// never surfaces to the caller and never undoes the availability write.
    fn log_transaction(&self, book_id: &str, action: TransactionAction) {
        let transactions = self.repository.transactions.clone();
        let book_id = book_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = transactions.append(&book_id, action).await {
                tracing::warn!(book_id = %book_id, ?action, "failed to log transaction: {}", e);
            }
        });
    }
}
