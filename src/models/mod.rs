//! Data models for Shelfmark

pub mod book;
pub mod transaction;

// Re-export commonly used types
pub use book::{Book, BookDraft, ValidatedBookDraft};
pub use transaction::{Transaction, TransactionAction};
